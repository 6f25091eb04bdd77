use crate::settings::structs::AppSettings;
use std::path::Path;
use std::sync::LazyLock;

/// Load the app settings from YAML + environment variables
pub fn load_app_settings() -> color_eyre::Result<AppSettings> {
    let config_path = Path::new("config/settings.yaml").canonicalize()?;

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );
    Ok(builder.build()?.try_deserialize::<AppSettings>()?)
}

/// Immutable global settings, initialized on first access.
pub static SETTINGS: LazyLock<AppSettings> =
    LazyLock::new(|| load_app_settings().expect("Failed to load app settings"));

#[must_use]
pub fn settings() -> &'static AppSettings {
    &SETTINGS
}

#[cfg(test)]
mod tests {
    use crate::settings::structs::AppSettings;

    const SAMPLE: &str = r#"
storage:
  bucket: event-photos
  region: us-east-1
  endpoint: null
  public_base_url: https://event-photos.s3.amazonaws.com
face_service:
  base_url: http://localhost:9400
pipeline:
  similarity_threshold: 70
  per_comparison_timeout_s: 30
  batch_size: 10
  batch_delay_ms: 500
  search_match_threshold: 99
  search_max_results: 5
  max_retries: 3
  retry_base_delay_ms: 500
logging:
  level: info
"#;

    #[test]
    fn sample_settings_deserialize() -> color_eyre::Result<()> {
        let settings: AppSettings = config::Config::builder()
            .add_source(config::File::from_str(SAMPLE, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?;

        assert_eq!(settings.pipeline.similarity_threshold, 70.0);
        assert_eq!(settings.pipeline.batch_size, 10);
        assert!(settings.storage.endpoint.is_none());
        Ok(())
    }
}
