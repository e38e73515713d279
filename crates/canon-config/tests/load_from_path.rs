use canon_config::{CanonConfig, ConfigError};

use pretty_assertions::assert_eq;

#[test]
fn loads_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canon.toml");
    std::fs::write(
        &path,
        "[analysis]\nthreads = 2\nstatic_accessors = true\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let config = CanonConfig::load_from_path(&path).unwrap();
    assert_eq!(config.analysis.worker_threads(), Some(2));
    assert!(config.analysis.static_accessors);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = CanonConfig::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    assert!(err.to_string().contains("missing.toml"), "{err}");
}
