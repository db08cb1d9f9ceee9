//! Configuration management for fortdoc.
//!
//! This module provides the [`Config`] struct which controls how sources are
//! found and extracted. Configuration can be loaded from:
//! - TOML files (`fortdoc.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`! fortdoc: -D MPI`)
//!
//! Config files are auto-discovered by searching parent directories from the input
//! up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::parser::Defines;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["fortdoc.toml", ".fortdoc.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_fortran_extensions() -> Vec<String> {
    [
        "f", "f90", "f95", "f03", "f08", "for", "ftn", "fpp", "F", "F90", "F95", "F03", "F08",
        "FOR", "FTN", "FPP",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

/// Main configuration struct for fortdoc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Preprocessor symbols treated as defined
    #[serde(default)]
    pub defines: Vec<String>,

    /// File extensions recognised as Fortran when walking directories
    #[serde(default = "default_fortran_extensions")]
    pub fortran_extensions: Vec<String>,

    /// Glob patterns of paths to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Descend into directories (default: false)
    #[serde(default)]
    pub recursive: bool,

    /// Pretty-print JSON output (default: false)
    #[serde(default)]
    pub pretty: bool,

    /// Files larger than this many bytes are skipped (default: 100 MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub defines: Option<Vec<String>>,
    pub fortran_extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub recursive: Option<bool>,
    pub pretty: Option<bool>,
    pub max_file_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            defines: Vec::new(),
            fortran_extensions: default_fortran_extensions(),
            exclude: Vec::new(),
            recursive: false,
            pretty: false,
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    /// Largest accepted `max_file_size` (1 GB)
    const MAX_FILE_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.max_file_size == 0 {
            return Some("max_file_size must be at least 1".to_string());
        }
        if self.max_file_size > Self::MAX_FILE_SIZE_LIMIT {
            return Some(format!(
                "max_file_size {} exceeds maximum of {}",
                self.max_file_size,
                Self::MAX_FILE_SIZE_LIMIT
            ));
        }
        if self.fortran_extensions.is_empty() {
            return Some("fortran_extensions must not be empty".to_string());
        }
        if let Some(ext) = self
            .fortran_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\']))
        {
            return Some(format!(
                "fortran_extensions entry '{ext}' must be a bare extension such as f90"
            ));
        }
        if let Some(symbol) = self.defines.iter().find(|s| !is_symbol(s)) {
            return Some(format!("define '{symbol}' is not a valid preprocessor symbol"));
        }
        for pattern in &self.exclude {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Some(format!("exclude pattern '{pattern}' is invalid: {e}"));
            }
        }
        None
    }

    /// Active preprocessor symbols
    #[must_use]
    pub fn defines(&self) -> Defines {
        self.defines.iter().cloned().collect()
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    ///
    /// `defines` and `exclude` accumulate across files; everything else is replaced.
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = &partial.defines {
            for symbol in v {
                if !self.defines.contains(symbol) {
                    self.defines.push(symbol.clone());
                }
            }
        }
        if let Some(v) = &partial.fortran_extensions {
            self.fortran_extensions.clone_from(v);
        }
        if let Some(v) = &partial.exclude {
            self.exclude.extend(v.iter().cloned());
        }
        if let Some(v) = partial.recursive {
            self.recursive = v;
        }
        if let Some(v) = partial.pretty {
            self.pretty = v;
        }
        if let Some(v) = partial.max_file_size {
            self.max_file_size = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => {
                        tracing::debug!(path = %path.display(), "loaded config file");
                        config.apply_partial(&partial);
                    }
                    Err(e) => tracing::warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}

/// Check if `symbol` can name a preprocessor macro
fn is_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.defines.is_empty());
        assert!(config.fortran_extensions.contains(&"f90".to_string()));
        assert!(!config.recursive);
        assert!(!config.pretty);
        assert_eq!(config.max_file_size, 100 * 1024 * 1024);
    }

    #[test]
    fn test_config_apply_partial() {
        let mut base = Config::default();
        let partial = PartialConfig {
            defines: Some(vec!["MPI".to_string()]),
            recursive: Some(true),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert_eq!(base.defines, vec!["MPI"]);
        assert!(base.recursive);
        // Other fields should remain at defaults
        assert!(!base.pretty);
        assert_eq!(base.fortran_extensions, default_fortran_extensions());
    }

    #[test]
    fn test_config_apply_partial_accumulates_lists() {
        let mut base = Config {
            defines: vec!["A".to_string()],
            exclude: vec!["build/*".to_string()],
            ..Default::default()
        };
        let partial = PartialConfig {
            defines: Some(vec!["A".to_string(), "B".to_string()]),
            exclude: Some(vec!["*_gen.f90".to_string()]),
            fortran_extensions: Some(vec!["f90".to_string()]),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert_eq!(base.defines, vec!["A", "B"]);
        assert_eq!(base.exclude, vec!["build/*", "*_gen.f90"]);
        assert_eq!(base.fortran_extensions, vec!["f90"]);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fortdoc.toml");
        std::fs::write(&path, "defines = [\"DOUBLE\"]\npretty = true\n").unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.defines, vec!["DOUBLE"]);
        assert!(config.pretty);
        assert!(config.defines().contains("DOUBLE"));
    }

    #[test]
    fn test_from_toml_file_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fortdoc.toml");
        std::fs::write(&path, "recursive = \"yes\"\n").unwrap();
        assert!(Config::from_toml_file(&path).is_err());
    }

    #[test]
    fn test_discovered_files_nearest_wins() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("src").join("solver");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            root.path().join("fortdoc.toml"),
            "defines = [\"MPI\"]\nmax_file_size = 2048\n",
        )
        .unwrap();
        std::fs::write(nested.join("fortdoc.toml"), "max_file_size = 4096\n").unwrap();
        let source = nested.join("cg.f90");
        std::fs::write(&source, "module cg\nend module cg\n").unwrap();

        let files = Config::discover_config_files(&source);
        let root_pos = files
            .iter()
            .position(|p| p == &root.path().join("fortdoc.toml"))
            .unwrap();
        let nested_pos = files
            .iter()
            .position(|p| p == &nested.join("fortdoc.toml"))
            .unwrap();
        assert!(root_pos < nested_pos);

        let config = Config::from_discovered_files(&source);
        assert!(config.defines.contains(&"MPI".to_string()));
        assert_eq!(config.max_file_size, 4096);
    }

    #[test]
    fn test_validate_default_config() {
        assert!(
            Config::default().validate().is_none(),
            "Default config should be valid"
        );
    }

    #[test]
    fn test_validate_max_file_size() {
        let config = Config {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("max_file_size"));

        let config = Config {
            max_file_size: u64::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_some());
    }

    #[test]
    fn test_validate_extensions() {
        let config = Config {
            fortran_extensions: vec![".f90".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains(".f90"));

        let config = Config {
            fortran_extensions: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_some());
    }

    #[test]
    fn test_validate_defines_and_exclude() {
        let config = Config {
            defines: vec!["1BAD".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("1BAD"));

        let config = Config {
            exclude: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("exclude"));

        let config = Config {
            defines: vec!["_OPENMP".to_string(), "HAVE_MPI2".to_string()],
            exclude: vec!["**/legacy/*".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_none());
    }
}
