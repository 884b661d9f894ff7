// Download module for fetching server jars under a concurrency limit

pub mod executor;
pub mod http;
pub mod progress;
pub mod task;
pub mod verify;

pub use executor::DownloadExecutor;
pub use progress::{NoopProgress, ProgressListener};
pub use task::DownloadTask;
pub use verify::{ArtifactVerifier, ChecksumVerifier, HashAlgorithm};
