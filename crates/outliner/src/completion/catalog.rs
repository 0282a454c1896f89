use serde::Serialize;

/// A model the settings store accepts, with its list pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// USD per million prompt tokens.
    pub input_price_per_1m: f64,
    /// USD per million completion tokens.
    pub output_price_per_1m: f64,
    pub notes: &'static str,
}

/// Known models. The first entry is the default.
pub const MODEL_CATALOG: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-4.1",
        name: "GPT-4.1",
        input_price_per_1m: 2.0,
        output_price_per_1m: 8.0,
        notes: "Flagship model, best quality.",
    },
    ModelInfo {
        id: "gpt-4.1-mini",
        name: "GPT-4.1 Mini",
        input_price_per_1m: 0.6,
        output_price_per_1m: 2.4,
        notes: "Faster and cheaper, good for most tasks.",
    },
    ModelInfo {
        id: "gpt-4.1-nano",
        name: "GPT-4.1 Nano",
        input_price_per_1m: 0.2,
        output_price_per_1m: 0.8,
        notes: "Fastest, lowest cost.",
    },
];

pub fn default_model() -> &'static str {
    MODEL_CATALOG[0].id
}

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    MODEL_CATALOG.iter().find(|m| m.id == id)
}

pub fn is_supported(id: &str) -> bool {
    find_model(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_first_entry() {
        assert_eq!(default_model(), "gpt-4.1");
    }

    #[test]
    fn test_find_model() {
        let mini = find_model("gpt-4.1-mini").unwrap();
        assert_eq!(mini.name, "GPT-4.1 Mini");
        assert!(find_model("gpt-2").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<_> = MODEL_CATALOG.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MODEL_CATALOG.len());
    }
}
