use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, ExportFormat, ExportSettings, LoggingSettings, ModelSettings, ProjectionSettings};

/// Loads the application configuration.
///
/// Sources are layered in order: the built-in defaults, then the given file (or
/// an optional `finmodel.toml` in the working directory), then environment
/// variables such as `FINMODEL__PROJECTION__HORIZON=8`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        // Tells the builder to look for an optional file named `finmodel.toml`
        None => config::File::with_name("finmodel").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix("FINMODEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

/// Rejects settings no model could be built from.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.model.periods == 0 {
        return Err(ConfigError::ValidationError(
            "model.periods must be at least 1".to_string(),
        ));
    }
    if config.projection.horizon == 0 {
        return Err(ConfigError::ValidationError(
            "projection.horizon must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn defaults_match_a_fresh_model() {
        let config = Config::default();
        assert_eq!(config.model.start_year, 2024);
        assert_eq!(config.model.periods, 5);
        assert_eq!(config.model.currency, "USD");
        assert_eq!(config.projection.default_base_revenue, dec!(1000000));
        assert_eq!(config.projection.default_base_margin_pct, dec!(30));
        assert_eq!(config.projection.margin_cap_pct, dec!(100));
        assert_eq!(config.export.format, ExportFormat::Json);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn file_values_override_defaults_section_by_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finmodel.toml");
        fs::write(
            &path,
            r#"
[model]
start_year = 2030
currency = "EUR"

[projection]
default_base_margin_pct = 25.5

[export]
format = "csv"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.model.start_year, 2030);
        assert_eq!(config.model.periods, 5);
        assert_eq!(config.model.currency, "EUR");
        assert_eq!(config.projection.default_base_margin_pct, dec!(25.5));
        assert_eq!(config.projection.default_base_revenue, dec!(1000000));
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_periods_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finmodel.toml");
        fs::write(&path, "[model]\nperiods = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
