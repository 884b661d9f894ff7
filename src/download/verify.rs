// Hash verification for downloaded artifacts

use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ProvisionError, Result};

const BUF_SIZE: usize = 64 * 1024;

/// Hash algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Get the algorithm prefix for formatted output
    pub fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(format!("Unsupported hash algorithm: {}", other)),
        }
    }
}

/// Post-download integrity check, run after a transfer completes and before
/// the artifact is moved into place.
pub trait ArtifactVerifier: Send + Sync {
    fn verify(&self, path: &Path) -> Result<()>;
}

/// Compute the hash of a file and return it formatted as `algorithm:hex`
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let mut file = File::open(path).map_err(|e| ProvisionError::io(path, e))?;
    let mut buf = vec![0u8; BUF_SIZE];

    let hash_hex = match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = file.read(&mut buf).map_err(|e| ProvisionError::io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            loop {
                let n = file.read(&mut buf).map_err(|e| ProvisionError::io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            hex::encode(hasher.finalize())
        }
    };

    Ok(format_hash(&hash_hex, algorithm))
}

/// Format an existing hash with algorithm prefix
pub fn format_hash(hash: &str, algorithm: HashAlgorithm) -> String {
    format!("{}:{}", algorithm.prefix(), hash)
}

/// Verifies a file against an expected `algorithm:hex` hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumVerifier {
    algorithm: HashAlgorithm,
    expected: String,
}

impl ChecksumVerifier {
    pub fn new(algorithm: HashAlgorithm, expected_hex: impl Into<String>) -> Self {
        Self {
            algorithm,
            expected: expected_hex.into().to_lowercase(),
        }
    }

    /// Parse a UV-style hash such as `sha256:abc123...`
    pub fn parse(formatted: &str) -> std::result::Result<Self, String> {
        let (algorithm, hex_part) = formatted
            .split_once(':')
            .ok_or_else(|| format!("Invalid hash format '{}': expected algorithm:hash", formatted))?;

        let algorithm: HashAlgorithm = algorithm.parse()?;
        if hex_part.is_empty() || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid hash format '{}': hash is not hex", formatted));
        }

        Ok(Self::new(algorithm, hex_part))
    }

    pub fn expected(&self) -> String {
        format_hash(&self.expected, self.algorithm)
    }
}

impl ArtifactVerifier for ChecksumVerifier {
    fn verify(&self, path: &Path) -> Result<()> {
        let actual = hash_file(path, self.algorithm)?;
        let expected = self.expected();
        if actual != expected {
            return Err(ProvisionError::Integrity {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}
