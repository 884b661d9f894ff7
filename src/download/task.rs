// Download task describing a single transfer

use futures::StreamExt;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::download::http;
use crate::download::progress::{NoopProgress, ProgressListener};
use crate::download::verify::ArtifactVerifier;
use crate::error::{ProvisionError, Result};

/// A single URL to stream into a destination file.
#[derive(Clone)]
pub struct DownloadTask {
    url: String,
    destination: PathBuf,
    verifier: Option<Arc<dyn ArtifactVerifier>>,
    progress: Arc<dyn ProgressListener>,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            verifier: None,
            progress: Arc::new(NoopProgress),
        }
    }

    /// Attach an integrity check run after the transfer, before the file is moved into place
    pub fn verifier(mut self, verifier: Arc<dyn ArtifactVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressListener>) -> Self {
        self.progress = progress;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Path the body is streamed to before it is renamed onto the destination
    pub fn part_path(&self) -> PathBuf {
        let mut name = self
            .destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".part");
        self.destination.with_file_name(name)
    }

    /// Run the transfer, reporting the outcome to the progress listener
    pub async fn run(&self) -> Result<()> {
        let result = self.transfer().await;
        match &result {
            Ok(()) => self.progress.on_complete(),
            Err(e) => self.progress.on_failure(&e.to_string()),
        }
        result
    }

    async fn transfer(&self) -> Result<()> {
        let parent = self
            .destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(ProvisionError::Precondition(format!(
                "Download destination directory {} does not exist",
                parent.display()
            )));
        }

        debug!("Downloading {} -> {}", self.url, self.destination.display());

        let response = http::get_success(&self.url).await?;
        self.progress.on_start(response.content_length());

        let part = self.part_path();
        let mut file = tokio::fs::File::create(&part)
            .await
            .map_err(|e| ProvisionError::io(&part, e))?;

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ProvisionError::download(&self.url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ProvisionError::io(&part, e))?;
            downloaded += chunk.len() as u64;
            self.progress.on_progress(downloaded);
        }

        file.flush().await.map_err(|e| ProvisionError::io(&part, e))?;
        drop(file);

        if let Some(verifier) = &self.verifier {
            let verifier = Arc::clone(verifier);
            let part_clone = part.clone();
            tokio::task::spawn_blocking(move || verifier.verify(&part_clone))
                .await
                .map_err(|e| ProvisionError::download(&self.url, e))??;
        }

        tokio::fs::rename(&part, &self.destination)
            .await
            .map_err(|e| ProvisionError::io(&self.destination, e))?;

        debug!(
            "Downloaded {} ({} bytes) to {}",
            self.url,
            downloaded,
            self.destination.display()
        );
        Ok(())
    }
}

impl std::fmt::Debug for DownloadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadTask")
            .field("url", &self.url)
            .field("destination", &self.destination)
            .field("verified", &self.verifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_path_appends_suffix() {
        let task = DownloadTask::new("https://example.com/a.jar", "/cache/spigot/v/spigot-server.jar");
        assert_eq!(
            task.part_path(),
            PathBuf::from("/cache/spigot/v/spigot-server.jar.part")
        );
    }

    #[tokio::test]
    async fn test_missing_destination_dir_fails_before_request() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("missing").join("spigot-server.jar");
        // Unroutable URL: the precondition must fail before any request is made
        let task = DownloadTask::new("http://127.0.0.1:9/never.jar", &dest);
        let err = task.run().await.unwrap_err();
        assert!(matches!(err, ProvisionError::Precondition(_)), "got {:?}", err);
    }
}
