mod common;

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_command(args: &[&str], test_dir: &str) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_spigot-provision"))
        .args(args)
        .env("SPIGOT_PROVISION_DIR", test_dir)
        .env_remove("SPIGOT_CACHE_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let success = output.status.success();
    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Combine stdout and stderr for checking messages
    let combined_output = if stdout.is_empty() {
        stderr.clone()
    } else if stderr.is_empty() {
        stdout.clone()
    } else {
        format!("{}\n{}", stdout, stderr)
    };

    (success, combined_output, stderr)
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

#[test]
fn test_init_creates_config() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) = run_command(&["init"], test_dir);

    assert!(success, "Init command should succeed. output: {}", output);
    assert!(
        output.contains("Initialized provision.toml"),
        "Expected 'Initialized provision.toml' in output: {}",
        output
    );

    let content = fs::read_to_string(temp_dir.path().join("provision.toml")).unwrap();
    assert!(content.contains("max_concurrency = 2"));
    assert!(content.contains("extract_bundle = false"));
    assert!(content.contains("verify_checksum = false"));
    assert!(content.contains("https://repo.codemc.io/repository/nms"));
}

#[test]
fn test_init_with_checksum_enables_verification() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) = run_command(
        &["init", "--extract", "--checksum", "sha256:abcdef"],
        test_dir,
    );
    assert!(success, "Init should succeed. output: {}", output);

    let content = fs::read_to_string(temp_dir.path().join("provision.toml")).unwrap();
    assert!(content.contains("extract_bundle = true"));
    assert!(content.contains("verify_checksum = true"));
    assert!(content.contains("sha256:abcdef"));
}

#[test]
fn test_init_rejects_invalid_checksum() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) = run_command(&["init", "--checksum", "md5:abc"], test_dir);
    assert!(!success, "Init should fail. output: {}", output);
    assert!(output.contains("Unsupported hash algorithm"), "output: {}", output);
    assert!(!temp_dir.path().join("provision.toml").exists());
}

#[test]
fn test_init_skips_if_exists() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success1, _, _) = run_command(&["init"], test_dir);
    assert!(success1);

    let (success2, output, _) = run_command(&["init"], test_dir);
    assert!(success2, "Second init should succeed. output: {}", output);
    assert!(
        output.contains("Skipping initialization"),
        "Expected skip message in output: {}",
        output
    );
}

#[test]
fn test_resolve_prints_url_and_paths() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) =
        run_command(&["resolve", "1.19.3-R0.1-20230314.170437-5"], test_dir);

    assert!(success, "Resolve should succeed. output: {}", output);
    assert!(output.contains("1.19.3-R0.1-SNAPSHOT"), "output: {}", output);
    assert!(
        output.contains(
            "https://repo.codemc.io/repository/nms/org/spigotmc/spigot/1.19.3-R0.1-SNAPSHOT/spigot-1.19.3-R0.1-20230314.170437-5-remapped-mojang.jar"
        ),
        "output: {}",
        output
    );

    let working = temp_dir
        .path()
        .join(".cache")
        .join("spigot")
        .join("1.19.3-R0.1-20230314.170437-5");
    assert!(working.is_dir(), "Working directory should be created");
}

#[test]
fn test_resolve_json_output() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, _, _) = run_command(&["init"], test_dir);
    assert!(success);
    fs::write(
        temp_dir.path().join("provision.toml"),
        "repository = \"http://localhost:8081/nms\"\ncache_dir = \"jars\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_spigot-provision"))
        .args(["resolve", "1.20.4-R0.1-20240423.152506-123", "--json"])
        .env("SPIGOT_PROVISION_DIR", test_dir)
        .env_remove("SPIGOT_CACHE_DIR")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["snapshot_version"], "1.20.4-R0.1-SNAPSHOT");
    assert_eq!(json["version"]["minecraft_version"], "1.20.4");
    assert_eq!(
        json["location"]["remote_url"],
        "http://localhost:8081/nms/org/spigotmc/spigot/1.20.4-R0.1-SNAPSHOT/spigot-1.20.4-R0.1-20240423.152506-123-remapped-mojang.jar"
    );
    assert!(
        json["location"]["working_dir"]
            .as_str()
            .unwrap()
            .contains("jars")
    );
}

#[test]
fn test_resolve_rejects_malformed_version() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, _, stderr) = run_command(&["resolve", "1.19.3-R0.1"], test_dir);

    assert!(!success, "Resolve should fail for a 2-segment version");
    assert!(stderr.contains("CodeMC nms repo"), "stderr: {}", stderr);
    assert!(
        stderr.contains("1.19.3-R0.1-20230314.170437-5"),
        "Expected example version in stderr: {}",
        stderr
    );
}

#[test]
fn test_provide_rejects_malformed_version() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, _, stderr) = run_command(&["provide", "not-a-version"], test_dir);

    assert!(!success);
    assert!(stderr.contains("Malformed Spigot version"), "stderr: {}", stderr);
    assert!(!temp_dir.path().join("provision.lock").exists());
}

#[test]
fn test_provide_from_cache_records_lockfile() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();
    let version = "1.19.3-R0.1-20230314.170437-5";

    // Pre-seed the cache so no network access is needed
    let working = temp_dir.path().join("cache").join("spigot").join(version);
    fs::create_dir_all(&working).unwrap();
    fs::write(working.join("spigot-server.jar"), b"jar").unwrap();

    let cache_dir = temp_dir.path().join("cache");
    let (success, output, _) = run_command(
        &["provide", version, "--cache-dir", cache_dir.to_str().unwrap()],
        test_dir,
    );
    assert!(success, "Provide should succeed. output: {}", output);
    assert!(output.contains("Using cached"), "output: {}", output);

    let lock = fs::read_to_string(temp_dir.path().join("provision.lock")).unwrap();
    assert!(lock.contains("configuration = \"named\""), "lock: {}", lock);
    assert!(
        lock.contains("org.spigotmc:spigot:1.19.3-R0.1-20230314.170437-5:remapped-mojang"),
        "lock: {}",
        lock
    );
}

#[test]
fn test_extract_command() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let bundle = temp_dir.path().join("bundle.jar");
    fs::write(&bundle, common::bundler_jar(b"server")).unwrap();
    let dest = temp_dir.path().join("out").join("server.jar");

    let (success, output, _) = run_command(
        &[
            "extract",
            bundle.to_str().unwrap(),
            dest.to_str().unwrap(),
        ],
        test_dir,
    );
    assert!(success, "Extract should succeed. output: {}", output);
    assert_eq!(fs::read(&dest).unwrap(), b"server");
}

#[test]
fn test_extract_rejects_multi_version_bundle() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let bundle = temp_dir.path().join("bundle.jar");
    common::write_jar(
        &bundle,
        &[(
            "META-INF/versions.list",
            b"a\tone\tone.jar\nb\ttwo\ttwo.jar\n",
        )],
    );
    let dest = temp_dir.path().join("server.jar");

    let (success, _, stderr) = run_command(
        &["extract", bundle.to_str().unwrap(), dest.to_str().unwrap()],
        test_dir,
    );
    assert!(!success);
    assert!(stderr.contains("but got 2"), "stderr: {}", stderr);
    assert!(!Path::new(&dest).exists());
}

#[test]
fn test_cache_lists_versions() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (success, output, _) = run_command(&["cache"], test_dir);
    assert!(success);
    assert!(output.contains("No cached versions"), "output: {}", output);

    let working = temp_dir
        .path()
        .join(".cache")
        .join("spigot")
        .join("1.19.3-R0.1-20230314.170437-5");
    fs::create_dir_all(&working).unwrap();
    fs::write(working.join("spigot-server.jar"), b"12345").unwrap();

    let (success, output, _) = run_command(&["cache", "--json"], test_dir);
    assert!(success, "output: {}", output);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["versions"][0]["version"], "1.19.3-R0.1-20230314.170437-5");
    assert_eq!(json["versions"][0]["bundled"], 5);
}
