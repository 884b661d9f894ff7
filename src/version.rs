// Version module for parsing CodeMC nms Spigot version strings

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ProvisionError, Result};

/// Number of dash-separated segments in a version string
const SEGMENT_COUNT: usize = 4;

/// A parsed Spigot version such as `1.19.3-R0.1-20230314.170437-5`.
///
/// Segments are positional: Minecraft version, Spigot API version, then the
/// snapshot build timestamp and build number from the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VersionToken {
    raw: String,
    minecraft_version: String,
    api_version: String,
    build_timestamp: String,
    build_number: String,
}

impl VersionToken {
    /// Parse a raw version string, requiring exactly four segments.
    ///
    /// Segments may be empty; a trailing dash counts as a fifth, empty segment.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('-').collect();
        if segments.len() != SEGMENT_COUNT {
            return Err(ProvisionError::malformed_version(raw));
        }

        Ok(Self {
            raw: raw.to_string(),
            minecraft_version: segments[0].to_string(),
            api_version: segments[1].to_string(),
            build_timestamp: segments[2].to_string(),
            build_number: segments[3].to_string(),
        })
    }

    /// The version string exactly as supplied
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Minecraft version, e.g. `1.19.3`
    pub fn minecraft_version(&self) -> &str {
        &self.minecraft_version
    }

    /// Spigot API version, e.g. `R0.1`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn build_timestamp(&self) -> &str {
        &self.build_timestamp
    }

    pub fn build_number(&self) -> &str {
        &self.build_number
    }

    /// Maven snapshot version the artifact is published under, e.g. `1.19.3-R0.1-SNAPSHOT`
    pub fn snapshot_version(&self) -> String {
        format!("{}-{}-SNAPSHOT", self.minecraft_version, self.api_version)
    }
}

impl FromStr for VersionToken {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
