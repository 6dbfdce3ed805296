use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use accesso::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Page budget: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_temp_config(
            r#"
            [crawler]
            max-pages = 25
            request-timeout = 10
            max-redirects = 3

            [user-agent]
            name = "Accesso WCAG 2.2 Auditor"
            contact-url = "https://example.com/about"

            [output]
            database-path = "./audits.db"
        "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.max_pages, 25);
        assert_eq!(config.output.database_path, "./audits.db");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_temp_config("not [ valid toml");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
