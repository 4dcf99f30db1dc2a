use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from a TOML file, then apply `OALENS_`-prefixed
/// environment overrides (`__` separates section from key, e.g.
/// `OALENS_SERVER__PORT`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    std::fs::metadata(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

    Figment::from(Toml::file_exact(path))
        .merge(Env::prefixed("OALENS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[lookup]
contact_email = "oa@example.org"

[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.lookup.contact_email, "oa@example.org");
        assert_eq!(config.lookup.timeout_secs, 30);
        assert_eq!(config.lookup.batch_size, 10);
        assert!(config.settings.enabled);
    }

    #[test]
    fn test_load_config_from_str_missing_lookup() {
        let toml = r#"
[server]
port = 8080
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[lookup]
contact_email = "oa@example.org"
min_match_score = 0.9

[server]
host = "127.0.0.1"
port = 3000

[settings]
enabled = false
visible_statuses = ["gold", "green"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.lookup.min_match_score, 0.9);
        assert!(!config.settings.enabled);
        assert_eq!(config.settings.visible_statuses.len(), 2);
    }

    #[test]
    fn test_pipeline_settings_assembly() {
        let config = load_config_from_str(
            r#"
[lookup]
contact_email = "oa@example.org"
"#,
        )
        .unwrap();

        let settings = config.pipeline_settings();
        assert_eq!(settings.contact_email, "oa@example.org");
        assert!(settings.enabled);
        assert_eq!(settings.visible_statuses.len(), 4);
    }
}
