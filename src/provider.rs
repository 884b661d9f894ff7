// Provider module sequencing parse, resolve, download, extract and register

use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::bundle::{self, BundleMetadata};
use crate::config::ProvisionConfig;
use crate::constants;
use crate::dependency::{DependencyCoordinate, DependencyRegistrar};
use crate::download::{
    ArtifactVerifier, DownloadExecutor, DownloadTask, NoopProgress, ProgressListener,
};
use crate::error::{ProvisionError, Result};
use crate::location::ResolvedLocation;
use crate::version::VersionToken;

/// Stage of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionState {
    Idle,
    Parsing,
    Resolving,
    Downloading,
    Extracting,
    Registering,
    Succeeded,
    Failed(String),
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionState::Idle => write!(f, "idle"),
            ProvisionState::Parsing => write!(f, "parsing"),
            ProvisionState::Resolving => write!(f, "resolving"),
            ProvisionState::Downloading => write!(f, "downloading"),
            ProvisionState::Extracting => write!(f, "extracting"),
            ProvisionState::Registering => write!(f, "registering"),
            ProvisionState::Succeeded => write!(f, "succeeded"),
            ProvisionState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub token: VersionToken,
    pub location: ResolvedLocation,
    /// Jar that was registered: the extracted jar when extraction ran, else the bundled jar
    pub artifact: PathBuf,
    pub coordinate: String,
    pub downloaded: bool,
    pub metadata: Option<BundleMetadata>,
}

/// Provisions the remapped Spigot server jar for one version string
pub struct SpigotProvider {
    cache_root: PathBuf,
    repository: String,
    max_concurrency: usize,
    extract_bundle: bool,
    force_download: bool,
    configuration: String,
    verifier: Option<Arc<dyn ArtifactVerifier>>,
    progress: Arc<dyn ProgressListener>,
    history: Vec<ProvisionState>,
}

impl SpigotProvider {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            repository: constants::DEFAULT_REPOSITORY.to_string(),
            max_concurrency: constants::DEFAULT_MAX_CONCURRENCY,
            extract_bundle: false,
            force_download: false,
            configuration: constants::DEFAULT_CONFIGURATION.to_string(),
            verifier: None,
            progress: Arc::new(NoopProgress),
            history: vec![ProvisionState::Idle],
        }
    }

    pub fn from_config(config: &ProvisionConfig, cache_root: impl Into<PathBuf>) -> Self {
        let mut provider = Self::new(cache_root)
            .repository(&config.repository)
            .max_concurrency(config.max_concurrency)
            .extract_bundle(config.extract_bundle)
            .configuration(&config.configuration);
        if let Some(verifier) = config.verifier() {
            provider = provider.verifier(Arc::new(verifier));
        }
        provider
    }

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn extract_bundle(mut self, enabled: bool) -> Self {
        self.extract_bundle = enabled;
        self
    }

    /// Download even when the bundled jar is already in the cache
    pub fn force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn ArtifactVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressListener>) -> Self {
        self.progress = progress;
        self
    }

    /// Current stage
    pub fn state(&self) -> &ProvisionState {
        self.history.last().unwrap_or(&ProvisionState::Idle)
    }

    /// Every stage entered during the last run, in order
    pub fn history(&self) -> &[ProvisionState] {
        &self.history
    }

    fn transition(&mut self, state: ProvisionState) {
        debug!("Provisioning: {} -> {}", self.state(), state);
        self.history.push(state);
    }

    /// Run the full pipeline for `raw_version`.
    ///
    /// The registrar is called exactly once, and only when every earlier stage
    /// succeeded. On failure the working directory and any partial download
    /// are left in place.
    pub async fn provide(
        &mut self,
        raw_version: &str,
        registrar: &mut dyn DependencyRegistrar,
    ) -> Result<ProvisionReport> {
        self.history = vec![ProvisionState::Idle];

        match self.run(raw_version, registrar).await {
            Ok(report) => {
                self.transition(ProvisionState::Succeeded);
                Ok(report)
            }
            Err(e) => {
                self.transition(ProvisionState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(
        &mut self,
        raw_version: &str,
        registrar: &mut dyn DependencyRegistrar,
    ) -> Result<ProvisionReport> {
        self.transition(ProvisionState::Parsing);
        let token = VersionToken::parse(raw_version)?;

        self.transition(ProvisionState::Resolving);
        let location =
            ResolvedLocation::resolve_with_repository(&token, &self.cache_root, &self.repository)?;

        self.transition(ProvisionState::Downloading);
        let downloaded = self.download(&location).await?;

        let mut metadata = None;
        let artifact = if self.extract_bundle {
            self.transition(ProvisionState::Extracting);
            metadata = BundleMetadata::from_jar(&location.bundled_jar)?;
            bundle::extract(&location.bundled_jar, metadata.as_ref(), &location.extracted_jar)?;
            location.extracted_jar.clone()
        } else {
            location.bundled_jar.clone()
        };

        self.transition(ProvisionState::Registering);
        let coordinate = DependencyCoordinate::spigot(&token).to_string();
        registrar.register(&coordinate, &self.configuration, &artifact);

        info!("Provided Spigot {} at {}", token, artifact.display());

        Ok(ProvisionReport {
            token,
            location,
            artifact,
            coordinate,
            downloaded,
            metadata,
        })
    }

    /// Fetch the bundled jar; returns whether a transfer happened
    async fn download(&self, location: &ResolvedLocation) -> Result<bool> {
        if !self.force_download && location.bundled_jar.is_file() {
            info!(
                "Using cached Spigot jar {}",
                location.bundled_jar.display()
            );
            if let Some(verifier) = &self.verifier {
                let verifier = Arc::clone(verifier);
                let jar = location.bundled_jar.clone();
                tokio::task::spawn_blocking(move || verifier.verify(&jar))
                    .await
                    .map_err(|e| ProvisionError::io(&location.bundled_jar, e.into()))?
                    .inspect_err(|_| {
                        warn!("Cached Spigot jar failed verification; re-run with --force")
                    })?;
            }
            return Ok(false);
        }

        info!("Downloading Spigot jar from {}", location.remote_url);

        let mut task = DownloadTask::new(&location.remote_url, &location.bundled_jar)
            .progress(Arc::clone(&self.progress));
        if let Some(verifier) = &self.verifier {
            task = task.verifier(Arc::clone(verifier));
        }

        let mut executor = DownloadExecutor::new(self.max_concurrency);
        executor.submit(task);
        executor.join().await?;

        Ok(true)
    }
}
