pub mod artifact;
pub mod index;

pub use artifact::{processed_path, ArtifactStorage};
pub use index::ProcessedIndex;
