//! Process-wide lookup of element records.
//!
//! The table is built once from a JSON dataset (`[{"Element", "Symbol", "AtomicNumber",
//! "AtomicMass"}, ...]`) and never changes afterwards. The crate ships the full table as
//! an embedded asset; a different dataset file can be selected in the configuration
//! (`periodic_table` key) or a ready table can be installed with
//! [`PeriodicTable::install_global`] before the first call to [`PeriodicTable::global`].
//! Every function that needs the table also has a variant taking `&PeriodicTable`, so the
//! core can be tested against small hand-made tables.
use crate::Chemistry::chem_error::{ChemError, Result};
use crate::Utils::load_from_file::load_periodic_table_from_file;
use crate::settings::periodic_table_path_snapshot;
use log::{error, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

const EMBEDDED_DATASET: &str = include_str!("../assets/periodic_table.json");

static GLOBAL_PERIODIC_TABLE: OnceLock<PeriodicTable> = OnceLock::new();

/// one record of the periodic table dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicElement {
    #[serde(rename = "Element")]
    pub name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "AtomicNumber", deserialize_with = "atomic_number_from_any")]
    pub atomic_number: u32,
    #[serde(rename = "AtomicMass", deserialize_with = "number_from_any")]
    pub atomic_mass: f64,
}

// datasets exported from spreadsheets carry numbers as strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn number_from_any<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("'{}' is not a number: {}", text, e))),
    }
}

fn atomic_number_from_any<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u32, D::Error> {
    let value = number_from_any(deserializer)?;
    if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "{} is not a valid atomic number",
            value
        )));
    }
    Ok(value as u32)
}

#[derive(Debug, Clone, Default)]
pub struct PeriodicTable {
    elements: Vec<PeriodicElement>,
    by_symbol: HashMap<String, usize>,
}

impl PeriodicTable {
    /// Builds a table from records. Symbols must be unique.
    pub fn from_elements(elements: Vec<PeriodicElement>) -> Result<Self> {
        let mut by_symbol = HashMap::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            if by_symbol.insert(element.symbol.clone(), i).is_some() {
                return Err(ChemError::Dataset(format!(
                    "duplicate symbol '{}'",
                    element.symbol
                )));
            }
        }
        Ok(Self {
            elements,
            by_symbol,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let elements: Vec<PeriodicElement> = serde_json::from_str(json)?;
        Self::from_elements(elements)
    }

    pub fn from_file(file_name: &str) -> Result<Self> {
        Self::from_elements(load_periodic_table_from_file(file_name)?)
    }

    /// The dataset compiled into the crate (elements 1-118).
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DATASET)
    }

    /// Returns the process-wide table, loading it on first use.
    pub fn global() -> &'static PeriodicTable {
        GLOBAL_PERIODIC_TABLE.get_or_init(load_global_table)
    }

    /// Installs `table` as the process-wide table. Fails once the global table exists.
    pub fn install_global(table: PeriodicTable) -> Result<()> {
        GLOBAL_PERIODIC_TABLE.set(table).map_err(|_| {
            ChemError::Dataset("the global periodic table is already initialised".to_string())
        })
    }

    /// Finds the single record whose symbol, name or atomic number matches `token`.
    /// Returns `None` when nothing or more than one record matches.
    pub fn lookup(&self, token: &str) -> Option<&PeriodicElement> {
        let mut matches = self.elements.iter().filter(|element| {
            element.symbol == token
                || element.name.eq_ignore_ascii_case(token)
                || element.atomic_number.to_string() == token
        });
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&PeriodicElement> {
        self.by_symbol.get(symbol).map(|&i| &self.elements[i])
    }

    pub fn atomic_mass(&self, symbol: &str) -> Option<f64> {
        self.by_symbol(symbol).map(|element| element.atomic_mass)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodicElement> {
        self.elements.iter()
    }
}

fn load_global_table() -> PeriodicTable {
    let configured = periodic_table_path_snapshot();
    if let Some(path) = configured {
        match PeriodicTable::from_file(&path) {
            Ok(table) => {
                info!("periodic table loaded from '{}' ({} elements)", path, table.len());
                return table;
            }
            Err(e) => warn!(
                "failed to load periodic table from '{}': {}, using the embedded dataset",
                path, e
            ),
        }
    }
    match PeriodicTable::embedded() {
        Ok(table) => table,
        Err(e) => {
            error!("embedded periodic table is broken: {}", e);
            PeriodicTable::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_table() {
        let table = PeriodicTable::embedded().unwrap();
        assert_eq!(table.len(), 118);
        let oxygen = table.by_symbol("O").unwrap();
        assert_eq!(oxygen.name, "Oxygen");
        assert_eq!(oxygen.atomic_number, 8);
        assert_relative_eq!(oxygen.atomic_mass, 15.999, epsilon = 1e-9);
    }

    #[test]
    fn test_lookup_by_any_field() {
        let table = PeriodicTable::embedded().unwrap();
        assert_eq!(table.lookup("Na").unwrap().name, "Sodium");
        assert_eq!(table.lookup("sodium").unwrap().symbol, "Na");
        assert_eq!(table.lookup("Sodium").unwrap().symbol, "Na");
        assert_eq!(table.lookup("11").unwrap().symbol, "Na");
        assert!(table.lookup("Zz").is_none());
        assert!(table.lookup("").is_none());
        // symbols are case sensitive
        assert!(table.lookup("NA").is_none());
    }

    #[test]
    fn test_lookup_rejects_ambiguous_token() {
        let json = r#"[
            {"Element": "Alpha", "Symbol": "Aa", "AtomicNumber": 1, "AtomicMass": 1.0},
            {"Element": "Aa", "Symbol": "Bb", "AtomicNumber": 2, "AtomicMass": 2.0}
        ]"#;
        let table = PeriodicTable::from_json_str(json).unwrap();
        assert!(table.lookup("Aa").is_none());
        assert_eq!(table.lookup("Bb").unwrap().name, "Aa");
    }

    #[test]
    fn test_numbers_given_as_strings() {
        let json = r#"[{"Element": "Hydrogen", "Symbol": "H",
            "AtomicNumber": "1", "AtomicMass": " 1.008 "}]"#;
        let table = PeriodicTable::from_json_str(json).unwrap();
        assert_relative_eq!(table.atomic_mass("H").unwrap(), 1.008, epsilon = 1e-12);
        assert_eq!(table.by_symbol("H").unwrap().atomic_number, 1);

        let bad = r#"[{"Element": "Hydrogen", "Symbol": "H",
            "AtomicNumber": 1, "AtomicMass": "light"}]"#;
        assert!(matches!(
            PeriodicTable::from_json_str(bad),
            Err(ChemError::Json(_))
        ));
    }

    #[test]
    fn test_duplicate_symbols_are_rejected() {
        let json = r#"[
            {"Element": "Hydrogen", "Symbol": "H", "AtomicNumber": 1, "AtomicMass": 1.008},
            {"Element": "Deuterium", "Symbol": "H", "AtomicNumber": 1, "AtomicMass": 2.014}
        ]"#;
        assert!(matches!(
            PeriodicTable::from_json_str(json),
            Err(ChemError::Dataset(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"[{{"Element": "Carbon", "Symbol": "C", "AtomicNumber": 6, "AtomicMass": 12.011}}]"#
        )
        .unwrap();
        let table = PeriodicTable::from_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.by_symbol("C").is_some());

        assert!(PeriodicTable::from_file("no_such_periodic_table.json").is_err());
    }

    #[test]
    fn test_global_table_is_shared() {
        let first = PeriodicTable::global();
        let second = PeriodicTable::global();
        assert!(std::ptr::eq(first, second));
        assert!(first.by_symbol("Fe").is_some());
        assert!(PeriodicTable::install_global(PeriodicTable::default()).is_err());
    }
}
