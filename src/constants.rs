// Constants module for shared string constants

pub const CONFIG_FILE: &str = "provision.toml";
pub const LOCKFILE_FILE: &str = "provision.lock";
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Maven repository hosting the remapped Spigot server jars
pub const DEFAULT_REPOSITORY: &str = "https://repo.codemc.io/repository/nms";

/// Group path of the Spigot artifact inside the repository
pub const SPIGOT_GROUP_PATH: &str = "org/spigotmc/spigot";

/// Classifier of the Mojang-mapped server artifact
pub const REMAPPED_CLASSIFIER: &str = "remapped-mojang";

/// Subdirectory of the cache root holding one directory per raw version
pub const SPIGOT_CACHE_SUBDIR: &str = "spigot";

pub const BUNDLED_SERVER_JAR: &str = "spigot-server.jar";
pub const EXTRACTED_SERVER_JAR: &str = "spigot-extracted_server.jar";

/// Concurrent in-flight transfers allowed while downloading the server jars
pub const DEFAULT_MAX_CONCURRENCY: usize = 2;

/// Configuration the resolved server jar is registered against
pub const DEFAULT_CONFIGURATION: &str = "named";

/// Example of a well-formed version, used in error guidance
pub const EXAMPLE_VERSION: &str = "1.19.3-R0.1-20230314.170437-5";

/// Schema version for the `cache --json` output format.
/// Increment only on breaking changes to ensure future integrations can safely evolve.
pub const SCHEMA_VERSION: u32 = 1;
