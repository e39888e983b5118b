// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use qraft::Config;
use qraft::constants::{render, scanner};
use qraft::render::RenderRequest;

fn temp_config_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("qraft-config-{}-{}", name, std::process::id()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.render.size, render::DEFAULT_SIZE);
    assert_eq!(config.render.margin, render::DEFAULT_MARGIN);
    assert_eq!(config.scanner.device_path, scanner::DEFAULT_DEVICE_PATH);
    assert_eq!(
        config.scanner.frame_interval(),
        scanner::DEFAULT_FRAME_INTERVAL
    );
}

#[test]
fn test_default_render_settings_are_valid() {
    // The defaults must always produce a renderable request
    let config = Config::default();
    assert!(RenderRequest::new("hello", &config.render).is_ok());
}

#[test]
fn test_missing_file_gives_defaults() {
    let path = temp_config_path("missing");
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_save_and_load() {
    let path = temp_config_path("save");
    let mut config = Config::default();
    config.render.dark_color = "#1E40AF".to_string();
    config.scanner.device_path = "/dev/video2".to_string();

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    assert_eq!(loaded.unwrap(), config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let path = temp_config_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"scanner": {"max_dimension": 320}}"#).unwrap();

    let loaded = Config::load_from(&path);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    let config = loaded.unwrap();
    assert_eq!(config.scanner.max_dimension, 320);
    assert_eq!(config.scanner.device_path, scanner::DEFAULT_DEVICE_PATH);
    assert_eq!(config.render, Config::default().render);
}

#[test]
fn test_malformed_file_is_config_error() {
    let path = temp_config_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let loaded = Config::load_from(&path);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    assert!(matches!(loaded, Err(qraft::AppError::Config(_))));
}
