//! Provisioning of remapped Spigot server jars.
//!
//! A CodeMC nms version string such as `1.19.3-R0.1-20230314.170437-5` is
//! parsed into a [`VersionToken`], resolved into a download URL and a
//! per-version cache directory, downloaded under a bounded executor, optionally
//! unpacked out of the server bundler jar, and finally handed to a
//! [`DependencyRegistrar`].

pub mod bundle;
pub mod config;
pub mod constants;
pub mod dependency;
pub mod download;
pub mod error;
pub mod location;
pub mod provider;
pub mod ui;
pub mod version;

pub use bundle::{BundleEntry, BundleMetadata};
pub use config::ProvisionConfig;
pub use dependency::{DependencyCoordinate, DependencyRegistrar, LockfileRegistrar};
pub use error::{ProvisionError, Result};
pub use location::ResolvedLocation;
pub use provider::{ProvisionReport, ProvisionState, SpigotProvider};
pub use version::VersionToken;
