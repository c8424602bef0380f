//! Configuration loading.
//!
//! Settings come from an optional TOML file; every field has a default
//! so a missing file or an empty document is valid. The POI API key can
//! always be supplied through the environment instead of the file.

use std::path::Path;

use transit_map_source_models::AppConfig;

use crate::SourceError;

/// Environment variable that overrides `pois.api_key`.
pub const POI_API_KEY_ENV: &str = "TRANSIT_MAP_POI_API_KEY";

/// Loads the pipeline configuration.
///
/// With `path` absent, returns the built-in defaults. The
/// [`POI_API_KEY_ENV`] variable, when set and non-empty, overrides the
/// file's `pois.api_key`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed, or if
/// `radii_m` is empty.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, SourceError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            toml::from_str(&text)?
        }
        None => AppConfig::default(),
    };

    if config.radii_m.is_empty() {
        return Err(SourceError::InvalidConfig {
            message: "radii_m must name at least one distance threshold".to_string(),
        });
    }

    if let Ok(key) = std::env::var(POI_API_KEY_ENV)
        && !key.is_empty()
    {
        config.pois.api_key = key;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.batch_cap, AppConfig::default().batch_cap);
    }

    #[test]
    fn empty_radii_list_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("transit_map_empty_radii.toml");
        std::fs::write(&path, "radii_m = []\n").unwrap();

        let result = load_config(Some(&path));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SourceError::InvalidConfig { .. })));
    }

    #[test]
    fn file_overrides_are_applied() {
        let dir = std::env::temp_dir();
        let path = dir.join("transit_map_overrides.toml");
        std::fs::write(&path, "db_path = \"elsewhere.sqlite3\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.db_path, "elsewhere.sqlite3");
    }
}
