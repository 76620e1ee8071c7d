#[allow(non_snake_case)]
pub mod Chemistry;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;

pub use Chemistry::chem_error::{ChemError, Result};
pub use Chemistry::element_map::{
    ElementCountMap, ElementMap, MoleRatioMap, PercentCompositionMap,
};
pub use Chemistry::formula_deriver::FormulaDeriver;
pub use Chemistry::formula_parser::parse_formula;
pub use Chemistry::molecule::{Molecule, MoleculeSource};
pub use Chemistry::periodic_table::{PeriodicElement, PeriodicTable};
