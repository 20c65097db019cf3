//! Configuration loading
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. `quanta.toml`, `quanta.yaml`/`quanta.yml`, `quanta.json` in the config directory
//! 3. An explicitly named file (`--config`)
//! 4. `QUANTA_*` environment variables, `__` separating nested keys
//!    (`QUANTA_FORMAT__DECIMALS=6`, `QUANTA_LOGGING__LEVEL=debug`)

use crate::logging::LoggingSettings;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use quanta_calc::{FormatOptions, Formatter, FormulaRegistry, FormulaSpec};
use quanta_errors::{QuantaError, QuantaResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "QUANTA_";

/// Stem of configuration files looked up in the config directory
pub const CONFIG_STEM: &str = "quanta";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantaConfig {
    /// Result formatting
    pub format: FormatOptions,
    pub logging: LoggingSettings,
    /// Formulas registered on top of the built-in catalogue
    pub formulas: Vec<FormulaSpec>,
}

impl QuantaConfig {
    /// Load from the default sources.
    ///
    /// `config_dir` defaults to the working directory. A missing `explicit`
    /// file is an error; missing files in the directory are skipped.
    pub fn load(config_dir: Option<&Path>, explicit: Option<&Path>) -> QuantaResult<Self> {
        load_with_env(config_dir, explicit, ENV_PREFIX)
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.format)
    }

    /// Built-in formulas plus the configured ones.
    pub fn registry(&self) -> QuantaResult<FormulaRegistry> {
        let mut registry = FormulaRegistry::with_builtins();
        for (index, spec) in self.formulas.iter().enumerate() {
            let name = spec.name.clone();
            if let Err(e) = registry.register(spec.clone()) {
                warn!("Custom formula '{}' rejected: {}", name, e);
                return Err(QuantaError::InvalidConfig {
                    field: format!("formulas[{}]", index),
                    reason: e.to_string(),
                });
            }
            debug!(formula = %name, "custom formula registered");
        }
        Ok(registry)
    }
}

fn load_with_env(
    config_dir: Option<&Path>,
    explicit: Option<&Path>,
    env_prefix: &str,
) -> QuantaResult<QuantaConfig> {
    let dir = config_dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut figment = Figment::from(Serialized::defaults(QuantaConfig::default()))
        .merge(Toml::file(dir.join(format!("{CONFIG_STEM}.toml"))))
        .merge(Yaml::file(dir.join(format!("{CONFIG_STEM}.yaml"))))
        .merge(Yaml::file(dir.join(format!("{CONFIG_STEM}.yml"))))
        .merge(Json::file(dir.join(format!("{CONFIG_STEM}.json"))));

    if let Some(path) = explicit {
        figment = merge_file(figment, path)?;
    }

    let config: QuantaConfig = figment
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(|e| QuantaError::Configuration(e.to_string()))?;

    info!(
        dir = %dir.display(),
        file = ?explicit.map(Path::display),
        formulas = config.formulas.len(),
        "Configuration loaded"
    );
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> QuantaResult<Figment> {
    if !path.exists() {
        return Err(QuantaError::FileNotFound(path.display().to_string()));
    }
    match extension(path).as_deref() {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
        Some("json") => Ok(figment.merge(Json::file(path))),
        other => Err(unsupported(path, other)),
    }
}

/// Load a single file of any supported format into `T`, without defaults
/// or environment overrides.
pub fn load_config_from_file<T: DeserializeOwned>(path: &Path) -> QuantaResult<T> {
    if !path.exists() {
        return Err(QuantaError::FileNotFound(path.display().to_string()));
    }
    let figment = match extension(path).as_deref() {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        other => return Err(unsupported(path, other)),
    };
    figment
        .extract()
        .map_err(|e| QuantaError::Configuration(format!("{}: {}", path.display(), e)))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn unsupported(path: &Path, ext: Option<&str>) -> QuantaError {
    QuantaError::Configuration(format!(
        "Unsupported config format '{}' for {}",
        ext.unwrap_or(""),
        path.display()
    ))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // No test sets variables with this prefix, so loads are isolated from
    // the developer's environment.
    const NO_ENV: &str = "QUANTA_CONFIG_TEST_UNSET_";

    const SPEED_YAML: &str = r#"
formulas:
  - name: average-speed
    title: Average Speed
    variables:
      - { symbol: s, name: distance, dimension: length, unit: km }
      - { symbol: t, name: time, dimension: time, unit: h }
      - { symbol: v, name: speed, dimension: velocity, unit: km/h }
    solve:
      v: { expression: "s / t", constraints: [{ rule: denominator, expr: t }] }
      s: { expression: "v * t" }
      t: { expression: "s / v", constraints: [{ rule: denominator, expr: v }] }
"#;

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = load_with_env(Some(dir.path()), None, NO_ENV).unwrap();
        assert_eq!(config, QuantaConfig::default());
        assert_eq!(config.format.decimals, 4);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_directory_files_merge() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("quanta.toml"),
            "[format]\ndecimals = 2\n\n[logging]\nlevel = \"info\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("quanta.json"), r#"{"format": {"decimals": 6}}"#).unwrap();

        let config = load_with_env(Some(dir.path()), None, NO_ENV).unwrap();
        assert_eq!(config.format.decimals, 6);
        assert_eq!(config.format.sci_digits, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_explicit_file_wins_over_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("quanta.yaml"), "format:\n  decimals: 2\n").unwrap();
        let explicit = dir.path().join("override.yml");
        fs::write(&explicit, "format:\n  decimals: 3\n  large: 1000.0\n").unwrap();

        let config = load_with_env(Some(dir.path()), Some(&explicit), NO_ENV).unwrap();
        assert_eq!(config.format.decimals, 3);
        assert_eq!(config.formatter().format(12345.0), "1.2345e4");
    }

    #[test]
    fn test_environment_overrides_files() {
        let prefix = "QUANTA_CONFIG_TEST_ENV_";
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("quanta.toml"), "[format]\ndecimals = 2\n").unwrap();
        std::env::set_var("QUANTA_CONFIG_TEST_ENV_FORMAT__DECIMALS", "7");
        std::env::set_var("QUANTA_CONFIG_TEST_ENV_LOGGING__JSON", "true");

        let config = load_with_env(Some(dir.path()), None, prefix).unwrap();

        std::env::remove_var("QUANTA_CONFIG_TEST_ENV_FORMAT__DECIMALS");
        std::env::remove_var("QUANTA_CONFIG_TEST_ENV_LOGGING__JSON");
        assert_eq!(config.format.decimals, 7);
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = load_with_env(Some(dir.path()), Some(&dir.path().join("nope.toml")), NO_ENV)
            .unwrap_err();
        assert!(matches!(err, QuantaError::FileNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quanta.ini");
        fs::write(&path, "decimals=2").unwrap();
        let err = load_with_env(Some(dir.path()), Some(&path), NO_ENV).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format 'ini'"));
    }

    #[test]
    fn test_malformed_value_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("quanta.toml"), "[format]\ndecimals = \"many\"\n").unwrap();
        let err = load_with_env(Some(dir.path()), None, NO_ENV).unwrap_err();
        assert!(matches!(err, QuantaError::Configuration(_)));
    }

    #[test]
    fn test_custom_formulas_are_registered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("quanta.yaml"), SPEED_YAML).unwrap();

        let config = load_with_env(Some(dir.path()), None, NO_ENV).unwrap();
        assert_eq!(config.formulas.len(), 1);

        let registry = config.registry().unwrap();
        assert!(registry.contains("average-speed"));
        assert!(registry.contains("cpm"));
        assert_eq!(registry.len(), FormulaRegistry::builtin().len() + 1);
    }

    #[test]
    fn test_invalid_custom_formula_is_config_error() {
        let dir = TempDir::new().unwrap();
        // Shadowing a built-in name
        let yaml = SPEED_YAML.replace("average-speed", "cpm");
        fs::write(dir.path().join("quanta.yaml"), yaml).unwrap();

        let config = load_with_env(Some(dir.path()), None, NO_ENV).unwrap();
        let err = config.registry().unwrap_err();
        match err {
            QuantaError::InvalidConfig { field, reason } => {
                assert_eq!(field, "formulas[0]");
                assert!(reason.contains("already registered"), "{reason}");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("format.json");
        fs::write(&path, r#"{"decimals": 1, "small": 0.1}"#).unwrap();

        let options: FormatOptions = load_config_from_file(&path).unwrap();
        assert_eq!(options.decimals, 1);
        assert_eq!(options.small, 0.1);
        assert_eq!(options.large, 1e6);
    }
}
