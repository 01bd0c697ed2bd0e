// FILE: src/cli/config.rs

use crate::error::{ExportError, Result};
use crate::exporters::ExportFormat;
use crate::ExportOptions;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub selector: Option<String>,
    pub include_collection_comments: Option<bool>,
    pub include_mode_comments: Option<bool>,
    pub use_modes_as_selectors: Option<bool>,
    pub prefix: Option<String>,
    pub selected_collections: Option<Vec<String>>,
    pub output_directory: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl ConfigFile {
    /// Export options with every field the file sets applied over the defaults
    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            selector: self.selector.clone().unwrap_or(defaults.selector),
            include_collection_comments: self
                .include_collection_comments
                .unwrap_or(defaults.include_collection_comments),
            include_mode_comments: self.include_mode_comments.unwrap_or(defaults.include_mode_comments),
            use_modes_as_selectors: self
                .use_modes_as_selectors
                .unwrap_or(defaults.use_modes_as_selectors),
            prefix: self.prefix.clone().filter(|prefix| !prefix.trim().is_empty()),
            selected_collections: self
                .selected_collections
                .as_ref()
                .map(|ids| ids.iter().cloned().collect()),
        }
    }

    /// Formats named in the file; unknown names are an error
    pub fn export_formats(&self) -> Result<Option<Vec<ExportFormat>>> {
        let Some(names) = &self.formats else {
            return Ok(None);
        };

        let mut formats = Vec::with_capacity(names.len());
        for name in names {
            if name.eq_ignore_ascii_case("all") {
                return Ok(Some(ExportFormat::ALL.to_vec()));
            }
            let format = ExportFormat::from_name(name)
                .ok_or_else(|| ExportError::config(format!("Unknown output format '{}'", name)))?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(Some(formats))
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| ExportError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content)
            .map_err(|e| ExportError::config(format!("Invalid JSON config: {}", e)))?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content)
            .map_err(|e| ExportError::config(format!("Invalid TOML config: {}", e)))?
    } else {
        return Err(ExportError::config("Config file must be .json or .toml format"));
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tokenc.toml");
        fs::write(
            &path,
            "selector = \":host\"\nprefix = \"ds\"\nuse_modes_as_selectors = true\nselected_collections = [\"c1\"]\nformats = [\"css\", \"ts\"]\noutput_directory = \"dist\"\n",
        )
        .unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        let options = config.export_options();
        assert_eq!(options.selector, ":host");
        assert_eq!(options.prefix.as_deref(), Some("ds"));
        assert!(options.use_modes_as_selectors);
        assert!(options.include_collection_comments);
        assert!(options.selected_collections.unwrap().contains("c1"));
        assert_eq!(config.output_directory.as_deref(), Some("dist"));
        assert_eq!(
            config.export_formats().unwrap(),
            Some(vec![ExportFormat::Css, ExportFormat::Typescript])
        );
    }

    #[test]
    fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tokenc.json");
        fs::write(&path, r#"{ "include_mode_comments": false, "formats": ["all"] }"#).unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert!(!config.export_options().include_mode_comments);
        assert_eq!(config.export_formats().unwrap(), Some(ExportFormat::ALL.to_vec()));
    }

    #[test]
    fn test_rejects_unknown_extension_and_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tokenc.yaml");
        fs::write(&path, "prefix: ds").unwrap();
        assert!(matches!(load(path.to_str().unwrap()), Err(ExportError::Config { .. })));

        let config = ConfigFile {
            formats: Some(vec!["xml".to_string()]),
            ..ConfigFile::default()
        };
        assert!(config.export_formats().is_err());
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        assert_eq!(ConfigFile::default().export_options(), ExportOptions::default());
    }
}
