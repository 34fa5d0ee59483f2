//! Column mapping for the configurable export layouts
//!
//! The quiz exports and the roster name their columns in whatever language
//! and wording the LMS was configured with, so every reader resolves its
//! configured header names against the file's actual header record before
//! touching any rows.

use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;

/// Header-name to column-index mapping for one parsed file
#[derive(Debug, Clone)]
pub struct ColumnMap {
    name_to_index: HashMap<String, usize>,
}

impl ColumnMap {
    /// Analyze a header record, mapping each trimmed header to its index.
    ///
    /// Duplicate headers keep the last occurrence, matching how the exports
    /// behave when a column is repeated.
    pub fn analyze(headers: &StringRecord) -> Self {
        let mut name_to_index = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            name_to_index.insert(header.trim().to_string(), index);
        }
        ColumnMap { name_to_index }
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name.trim()).copied()
    }

    /// Check if a column exists in the mapping
    pub fn has_column(&self, column_name: &str) -> bool {
        self.name_to_index.contains_key(column_name.trim())
    }

    /// List the configured names that did NOT resolve against this header
    pub fn missing_columns(&self, wanted: &[&str]) -> Vec<String> {
        wanted
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Iterate the headers found in the file, for diagnostics
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.name_to_index.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.name_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_index.is_empty()
    }
}

/// Get a mapped field's raw cell from a CSV record.
///
/// The cell text is returned untouched; normalization (trimming, case,
/// score coercion) is the caller's concern. A row shorter than the mapped
/// index is a row-level error.
pub fn get_required_field<'a>(
    record: &'a StringRecord,
    map: &ColumnMap,
    field_name: &str,
) -> Result<&'a str> {
    let index = map.get_index(field_name).ok_or_else(|| {
        Error::data_validation(format!("Required column '{}' not found", field_name))
    })?;

    record.get(index).ok_or_else(|| {
        Error::data_validation(format!(
            "Row has no value for required column '{}'",
            field_name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> StringRecord {
        StringRecord::from(names.to_vec())
    }

    #[test]
    fn test_analyze_maps_trimmed_headers() {
        let map = ColumnMap::analyze(&headers(&[" Dirección de correo ", "Calificación/10,00"]));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index("Dirección de correo"), Some(0));
        assert_eq!(map.get_index("Calificación/10,00"), Some(1));
        assert!(!map.has_column("Nombre"));
    }

    #[test]
    fn test_missing_columns() {
        let map = ColumnMap::analyze(&headers(&["Nombre", "Apellido(s)"]));

        let missing = map.missing_columns(&["Nombre", "Dirección de correo", "Grupos"]);
        assert_eq!(missing, vec!["Dirección de correo", "Grupos"]);

        assert!(map.missing_columns(&["Nombre", "Apellido(s)"]).is_empty());
    }

    #[test]
    fn test_get_required_field() {
        let map = ColumnMap::analyze(&headers(&["Correo", "Nota"]));
        let row = StringRecord::from(vec![" a@x.com ", "8,5"]);

        // Cells come back raw; callers normalize
        assert_eq!(get_required_field(&row, &map, "Correo").unwrap(), " a@x.com ");
        assert_eq!(get_required_field(&row, &map, "Nota").unwrap(), "8,5");
    }

    #[test]
    fn test_get_required_field_failures() {
        let map = ColumnMap::analyze(&headers(&["Correo", "Nota"]));
        let short_row = StringRecord::from(vec!["a@x.com"]);

        assert!(get_required_field(&short_row, &map, "Nota").is_err());
        assert!(get_required_field(&short_row, &map, "Inexistente").is_err());
    }
}
