use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime,
}
