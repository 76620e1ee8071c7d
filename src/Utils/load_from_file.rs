use crate::Chemistry::chem_error::{ChemError, Result};
use crate::Chemistry::periodic_table::PeriodicElement;
use log::{error, info, warn};
use std::fs;
use std::path::Path;

/// Reads a periodic table dataset: a JSON array of
/// `{"Element": .., "Symbol": .., "AtomicNumber": .., "AtomicMass": ..}` records.
pub fn load_periodic_table_from_file(file_name: &str) -> Result<Vec<PeriodicElement>> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(ChemError::Dataset(format!(
            "File '{}' does not exist",
            file_name
        )));
    }
    let content = fs::read_to_string(path)?;

    match serde_json::from_str::<Vec<PeriodicElement>>(&content) {
        Ok(elements) => {
            info!(
                "Successfully parsed {} elements from file '{}'",
                elements.len(),
                file_name
            );
            validate_periodic_elements(&elements);
            Ok(elements)
        }
        Err(e) => {
            error!(
                "Error parsing periodic table at line {}, column {} in file '{}': {}",
                e.line(),
                e.column(),
                file_name,
                e
            );
            // show the problematic line with a pointer to the column
            if let Some(problem_line) = content.lines().nth(e.line().saturating_sub(1)) {
                error!("Problematic line: {}", problem_line);
                if e.column() >= 1 && e.column() <= problem_line.len() {
                    error!("{}^", " ".repeat(e.column() - 1));
                }
            }
            Err(e.into())
        }
    }
}

/// Logs suspicious records; nothing here is fatal.
pub fn validate_periodic_elements(elements: &[PeriodicElement]) {
    if elements.is_empty() {
        warn!("Loaded periodic table is empty");
    }
    for element in elements {
        if !(element.atomic_mass > 0.0) {
            warn!(
                "Element '{}' has a non-positive atomic mass {}",
                element.symbol, element.atomic_mass
            );
        }
        let mut chars = element.symbol.chars();
        let well_formed = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_lowercase());
        if !well_formed {
            warn!(
                "Element '{}' has a symbol that formulas cannot reference",
                element.symbol
            );
        }
    }
}
