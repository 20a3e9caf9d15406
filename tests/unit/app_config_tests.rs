/*!
 * Tests for application configuration functionality
 */

use vocabcut::app_config::{Config, CutMode, LogLevel};
use vocabcut::models::BurnMode;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.encoder.ffmpeg_path, "ffmpeg");
    assert_eq!(config.encoder.ffprobe_path, "ffprobe");
    assert_eq!(config.encoder.timeout_secs, 600);
    assert_eq!(config.encoder.cut_mode, CutMode::Copy);
    assert_eq!(config.render.mode, BurnMode::Full);
    assert_eq!(config.render.degenerate_epsilon_secs, 0.1);
    assert_eq!(config.layout.default_canvas_width, 720);
    assert_eq!(config.layout.default_canvas_height, 1280);
    assert!(config.database.path.is_none());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.encoder.ffmpeg_path = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.layout.title_font_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.render.degenerate_epsilon_secs = -0.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.layout.margin_fraction = -0.1;
    assert!(config.validate().is_err());
}

/// Test that a saved default configuration loads back unchanged
#[test]
fn test_config_serialization_withDefaultConfig_shouldRoundTripThroughFile() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.render.title_text = "Daily Words".to_string();
    config.encoder.aspect = Some("9:16".to_string());
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.render.title_text, "Daily Words");
    assert_eq!(loaded.encoder.aspect.as_deref(), Some("9:16"));
    assert!(loaded.validate().is_ok());
}

/// Test enum spellings accepted in conf.json
#[test]
fn test_config_deserialize_withEnumValues_shouldParse() {
    let config: Config = serde_json::from_str(
        r#"{ "log_level": "debug", "encoder": { "cut_mode": "reencode" }, "render": { "mode": "keywords_only" } }"#,
    )
    .unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.encoder.cut_mode, CutMode::Reencode);
    assert_eq!(config.render.mode, BurnMode::KeywordsOnly);
    assert_eq!(log::LevelFilter::from(&config.log_level), log::LevelFilter::Debug);
}

/// Test the burn mode parser used for CLI-style strings
#[test]
fn test_burnMode_fromStr_withAliases_shouldParse() {
    assert_eq!("keywords-only".parse::<BurnMode>().unwrap(), BurnMode::KeywordsOnly);
    assert_eq!("TITLE".parse::<BurnMode>().unwrap(), BurnMode::TitleOnly);
    assert_eq!(BurnMode::Full.to_string(), "full");
    assert!("everything".parse::<BurnMode>().is_err());
}
