//! Configuration management and validation.
//!
//! The pipeline reads one JSON configuration file at startup. Its keys are
//! Spanish, matching the LMS export domain the tool serves; every key is
//! optional and falls back to the defaults in [`crate::constants`]. The file
//! is located via `--config`, then `./config.json`, then the per-user config
//! directory. A missing file is a fatal configuration error, while an empty
//! `{}` file yields a fully defaulted configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::app::models::ScorePolicy;
use crate::constants;
use crate::{Error, Result};

/// Column headers expected in the per-quiz grade exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeColumns {
    /// Header of the student email column
    #[serde(default = "default_grade_email")]
    pub correo: String,

    /// Header of the score column
    #[serde(default = "default_grade_score")]
    pub calificacion: String,
}

impl Default for GradeColumns {
    fn default() -> Self {
        Self {
            correo: default_grade_email(),
            calificacion: default_grade_score(),
        }
    }
}

/// Column headers expected in the student roster export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterColumns {
    /// Header of the student email column
    #[serde(default = "default_roster_email")]
    pub correo: String,

    /// Header of the first-name column
    #[serde(default = "default_roster_first_name")]
    pub nombre: String,

    /// Header of the surname column
    #[serde(default = "default_roster_surname")]
    pub apellido: String,

    /// Header of the group-membership column. An explicit JSON `null`
    /// disables the Regional column entirely; leaving the key out keeps
    /// the default header.
    #[serde(default = "default_roster_groups", deserialize_with = "some_or_null")]
    pub grupos: Option<String>,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            correo: default_roster_email(),
            nombre: default_roster_first_name(),
            apellido: default_roster_surname(),
            grupos: default_roster_groups(),
        }
    }
}

/// Runtime configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the per-quiz grade exports
    #[serde(rename = "ruta_calificaciones", default = "default_grades_dir")]
    pub grades_dir: PathBuf,

    /// Directory holding the student roster export
    #[serde(rename = "ruta_estudiantes", default = "default_roster_dir")]
    pub roster_dir: PathBuf,

    /// Path of the consolidated report to write
    #[serde(rename = "archivo_salida", default = "default_output_file")]
    pub output_file: PathBuf,

    /// Column headers in the grade exports
    #[serde(rename = "columnas_calificaciones", default)]
    pub grade_columns: GradeColumns,

    /// Column headers in the roster export
    #[serde(rename = "columnas_estudiantes", default)]
    pub roster_columns: RosterColumns,

    /// How score cells are interpreted
    #[serde(rename = "politica_calificaciones", default)]
    pub score_policy: ScorePolicy,

    /// Replace non-ASCII bytes in console log output with `?`, for
    /// consoles that cannot render the exports' accented characters
    #[serde(rename = "consola_ascii", default)]
    pub ascii_console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grades_dir: default_grades_dir(),
            roster_dir: default_roster_dir(),
            output_file: default_output_file(),
            grade_columns: GradeColumns::default(),
            roster_columns: RosterColumns::default(),
            score_policy: ScorePolicy::default(),
            ascii_console: false,
        }
    }
}

impl Config {
    /// Load the configuration, resolving the file location.
    ///
    /// An explicitly given path must exist. Otherwise `./config.json` is
    /// tried, then the per-user location from [`Config::user_config_path`].
    /// No file at any location is a fatal configuration error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = Self::find_config_file(explicit_path)?;
        info!("Using config file: {}", config_path.display());
        Self::from_file(&config_path)
    }

    /// Parse a configuration file, filling absent keys with defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Invalid config file '{}': {}", path.display(), e))
        })?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Resolve which configuration file to use
    fn find_config_file(explicit_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Ok(path.to_path_buf());
        }

        let local = PathBuf::from(constants::CONFIG_FILENAME);
        if local.exists() {
            return Ok(local);
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Ok(user_path);
            }
        }

        Err(Error::configuration(format!(
            "No config file found: looked for ./{} and the per-user location",
            constants::CONFIG_FILENAME
        )))
    }

    /// Per-user configuration file location, if a config directory exists
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::CONFIG_DIR_NAME)
                .join(constants::CONFIG_FILENAME)
        })
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.output_file.as_os_str().is_empty() {
            return Err(Error::configuration(
                "Output file path cannot be empty".to_string(),
            ));
        }

        let named_columns = [
            ("columnas_calificaciones.correo", &self.grade_columns.correo),
            (
                "columnas_calificaciones.calificacion",
                &self.grade_columns.calificacion,
            ),
            ("columnas_estudiantes.correo", &self.roster_columns.correo),
            ("columnas_estudiantes.nombre", &self.roster_columns.nombre),
            (
                "columnas_estudiantes.apellido",
                &self.roster_columns.apellido,
            ),
        ];
        for (key, value) in named_columns {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "Column name '{}' cannot be empty",
                    key
                )));
            }
        }

        if let Some(grupos) = &self.roster_columns.grupos {
            if grupos.trim().is_empty() {
                return Err(Error::configuration(
                    "Column name 'columnas_estudiantes.grupos' cannot be empty \
                     (use null to disable the Regional column)"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

// Serde default functions

fn default_grades_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_GRADES_DIR)
}

fn default_roster_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_ROSTER_DIR)
}

fn default_output_file() -> PathBuf {
    PathBuf::from(constants::DEFAULT_OUTPUT_FILENAME)
}

fn default_grade_email() -> String {
    constants::grade_columns::EMAIL.to_string()
}

fn default_grade_score() -> String {
    constants::grade_columns::SCORE.to_string()
}

fn default_roster_email() -> String {
    constants::roster_columns::EMAIL.to_string()
}

fn default_roster_first_name() -> String {
    constants::roster_columns::FIRST_NAME.to_string()
}

fn default_roster_surname() -> String {
    constants::roster_columns::SURNAME.to_string()
}

fn default_roster_groups() -> Option<String> {
    Some(constants::roster_columns::GROUPS.to_string())
}

/// Deserialize a present key, letting JSON `null` become `None`.
///
/// Without this, serde would treat `null` and an absent key identically and
/// the `grupos: null` opt-out could never be expressed.
fn some_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "{}");

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.grades_dir, PathBuf::from("Calificaciones"));
        assert_eq!(config.roster_dir, PathBuf::from("Lista de estudiantes"));
        assert_eq!(config.output_file, PathBuf::from("reporte_final.csv"));
        assert_eq!(config.grade_columns.correo, "Dirección de correo");
        assert_eq!(config.grade_columns.calificacion, "Calificación/10,00");
        assert_eq!(config.roster_columns.grupos.as_deref(), Some("Grupos"));
        assert_eq!(config.score_policy, ScorePolicy::Numeric);
        assert!(!config.ascii_console);
    }

    #[test]
    fn test_partial_overrides_keep_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"{
                "ruta_calificaciones": "Notas",
                "columnas_calificaciones": {"calificacion": "Nota final"},
                "politica_calificaciones": "cruda"
            }"#,
        );

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.grades_dir, PathBuf::from("Notas"));
        assert_eq!(config.grade_columns.calificacion, "Nota final");
        // Untouched keys keep their defaults
        assert_eq!(config.grade_columns.correo, "Dirección de correo");
        assert_eq!(config.output_file, PathBuf::from("reporte_final.csv"));
        assert_eq!(config.score_policy, ScorePolicy::Raw);
    }

    #[test]
    fn test_null_groups_disables_regional() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"{"columnas_estudiantes": {"grupos": null}}"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.roster_columns.grupos, None);
    }

    #[test]
    fn test_absent_groups_keeps_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"{"columnas_estudiantes": {"nombre": "Nombres"}}"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.roster_columns.nombre, "Nombres");
        assert_eq!(config.roster_columns.grupos.as_deref(), Some("Grupos"));
    }

    #[test]
    fn test_malformed_json_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "{ ruta: ");

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_explicit_missing_path_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no_existe.json");

        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_column_name() {
        let mut config = Config::default();
        config.grade_columns.correo = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.roster_columns.grupos = Some(String::new());
        assert!(config.validate().is_err());

        // Disabled groups column is fine
        let mut config = Config::default();
        config.roster_columns.grupos = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_output() {
        let config = Config {
            output_file: PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
