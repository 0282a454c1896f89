pub mod error;
pub mod listener;
pub mod runner;

pub use error::{FailureReason, JobFailure, PipelineWarning};
pub use listener::{
    BroadcastListener, ChannelListener, FanoutListener, JobListener, LogListener, NoopListener,
};
pub use runner::{JobOutput, TransformPipeline};
