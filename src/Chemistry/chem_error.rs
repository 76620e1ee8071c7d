use thiserror::Error;

/// error types for formula parsing, molecule construction and formula derivation
#[derive(Debug, Error)]
pub enum ChemError {
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
    #[error("'{0}' does not resolve to exactly one element")]
    InvalidElement(String),
    #[error("Invalid composition: {0}")]
    InvalidComposition(String),
    #[error("Mole ratio {ratio} of element {element} cannot be reduced to a whole number")]
    UnresolvedRatio { element: String, ratio: f64 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid CAS number: {0}")]
    InvalidCasNumber(String),
    #[error("Periodic table dataset error: {0}")]
    Dataset(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChemError {
    pub(crate) fn invalid_formula(formula: &str, reason: impl Into<String>) -> Self {
        ChemError::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChemError>;
