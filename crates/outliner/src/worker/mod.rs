pub mod job;
pub mod orchestrator;
pub mod scanner;

pub use job::{Job, JobId, JobState};
pub use orchestrator::JobOrchestrator;
pub use scanner::{DirectoryScanner, SourceFile, DEFAULT_RECENT_LIMIT};
