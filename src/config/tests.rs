use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only; env tests are serialized.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only; env tests are serialized.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_lodestar_env() {
    // SAFETY: Test code only; env tests are serialized.
    unsafe {
        env::remove_var("LODESTAR_MODEL_PATH");
        env::remove_var("LODESTAR_ASSET_BASE");
        env::remove_var("LODESTAR_QUEUE_CAPACITY");
        env::remove_var("LODESTAR_PRELOAD_MODEL");
        env::remove_var("LODESTAR_MAX_SEQ_LEN");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.model_path.is_none());
    assert_eq!(config.asset_base, "./public");
    assert_eq!(config.queue_capacity, 64);
    assert!(!config.preload_model);
    assert_eq!(config.max_seq_len, 512);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_lodestar_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert!(config.model_path.is_none());
    assert_eq!(config.asset_base, DEFAULT_ASSET_BASE);
    assert_eq!(config.queue_capacity, 64);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_lodestar_env();

    let config = with_env_vars(
        &[
            ("LODESTAR_MODEL_PATH", "/models/bge-small"),
            ("LODESTAR_ASSET_BASE", "https://cdn.example.com/assets"),
            ("LODESTAR_QUEUE_CAPACITY", "8"),
            ("LODESTAR_PRELOAD_MODEL", "true"),
            ("LODESTAR_MAX_SEQ_LEN", "128"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.model_path, Some(PathBuf::from("/models/bge-small")));
    assert_eq!(config.asset_base, "https://cdn.example.com/assets");
    assert_eq!(config.queue_capacity, 8);
    assert!(config.preload_model);
    assert_eq!(config.max_seq_len, 128);
    assert!(config.asset_base_is_url());
}

#[test]
#[serial]
fn test_blank_model_path_is_none() {
    clear_lodestar_env();

    let config = with_env_vars(&[("LODESTAR_MODEL_PATH", "   ")], Config::from_env).unwrap();
    assert!(config.model_path.is_none());
}

#[test]
#[serial]
fn test_invalid_queue_capacity() {
    clear_lodestar_env();

    let result = with_env_vars(&[("LODESTAR_QUEUE_CAPACITY", "lots")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber {
            name: "LODESTAR_QUEUE_CAPACITY",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_preload_bool_forms() {
    clear_lodestar_env();

    for (value, expected) in [("1", true), ("YES", true), ("off", false), ("0", false)] {
        let config =
            with_env_vars(&[("LODESTAR_PRELOAD_MODEL", value)], Config::from_env).unwrap();
        assert_eq!(config.preload_model, expected, "value {value:?}");
    }

    let result = with_env_vars(&[("LODESTAR_PRELOAD_MODEL", "maybe")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidBool { .. })));
}

#[test]
fn test_validate_zero_capacity() {
    let config = Config {
        queue_capacity: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue { .. })
    ));
}

#[test]
fn test_validate_missing_model_path() {
    let config = Config {
        model_path: Some(PathBuf::from("/nonexistent/lodestar/model")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_must_be_dir() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_asset_base_file_rejected() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        asset_base: file.path().display().to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_ok_with_dirs() {
    let model = tempfile::tempdir().unwrap();
    let assets = tempfile::tempdir().unwrap();
    let config = Config {
        model_path: Some(model.path().to_path_buf()),
        asset_base: assets.path().display().to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_encoder_config_stub_without_model() {
    assert!(Config::default().encoder_config().testing_stub);

    let config = Config {
        model_path: Some(PathBuf::from("/models/x")),
        max_seq_len: 64,
        ..Default::default()
    };
    let encoder = config.encoder_config();
    assert!(!encoder.testing_stub);
    assert_eq!(encoder.max_seq_len, 64);
}

#[test]
fn test_worker_options_and_source() {
    let config = Config {
        queue_capacity: 3,
        preload_model: true,
        ..Default::default()
    };
    let options = config.worker_options();
    assert_eq!(options.queue_capacity, 3);
    assert!(options.preload);
    assert!(matches!(config.asset_source(), crate::source::AssetSource::File(_)));
}
