//! Test utilities for the grade reader
//!
//! Helpers for writing quiz export fixtures with the default Moodle-style
//! header, shared across the test modules.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GradeColumns;

// Test modules
mod labels_tests;
mod reader_tests;
mod stats_tests;

/// Grade columns matching the default export layout
pub fn test_columns() -> GradeColumns {
    GradeColumns {
        correo: "Dirección de correo".to_string(),
        calificacion: "Calificación/10,00".to_string(),
    }
}

/// Write a quiz export with the default header and one row per (email, score)
pub fn write_export(dir: &Path, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    // The score header contains a comma, so it must be quoted
    let mut content = String::from("Nombre,Dirección de correo,Estado,\"Calificación/10,00\"\n");
    for (email, score) in rows {
        content.push_str(&format!("Alguien,{},Finalizado,\"{}\"\n", email, score));
    }
    write_raw(dir, name, &content)
}

/// Write arbitrary file content under `dir`
pub fn write_raw(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
