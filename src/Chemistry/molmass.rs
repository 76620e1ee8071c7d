//! Module to calculate the atomic composition and molar mass of chemical formulae
use crate::Chemistry::chem_error::Result;
use crate::Chemistry::element_map::ElementCountMap;
use crate::Chemistry::molecule::Molecule;
use crate::Chemistry::periodic_table::PeriodicTable;
use log::info;
use nalgebra::DMatrix;

// Function to calculate the molar mass of a substance given its chemical formula
pub fn calculate_molar_mass(formula: &str) -> Result<(f64, ElementCountMap)> {
    calculate_molar_mass_with(formula, PeriodicTable::global())
}

pub fn calculate_molar_mass_with(
    formula: &str,
    table: &PeriodicTable,
) -> Result<(f64, ElementCountMap)> {
    let molecule = Molecule::from_formula_string_with(formula, table)?;
    Ok((molecule.mass(), molecule.elements().clone()))
}

// Function to calculate the molar mass of a vector of chemical formulas
pub fn calculate_molar_mass_of_vector_of_subs(vec_of_formulae: &[&str]) -> Result<Vec<f64>> {
    let table = PeriodicTable::global();
    vec_of_formulae
        .iter()
        .map(|formula| Molecule::from_formula_string_with(formula, table).map(|m| m.mass()))
        .collect()
}

/// Matrix of atomic composition: one row per substance, one column per element.
/// Elements are ordered by first appearance across the substances.
pub fn create_elem_composition_matrix(
    vec_of_formulae: &[&str],
) -> Result<(DMatrix<f64>, Vec<String>)> {
    create_elem_composition_matrix_with(vec_of_formulae, PeriodicTable::global())
}

pub fn create_elem_composition_matrix_with(
    vec_of_formulae: &[&str],
    table: &PeriodicTable,
) -> Result<(DMatrix<f64>, Vec<String>)> {
    let mut unique_vec_of_elems: Vec<String> = Vec::new();
    let mut vec_of_compositions = Vec::with_capacity(vec_of_formulae.len());
    for formula in vec_of_formulae {
        let counts = Molecule::from_formula_string_with(formula, table)?
            .elements()
            .clone();
        for element in counts.keys() {
            if !unique_vec_of_elems.iter().any(|e| e == element) {
                unique_vec_of_elems.push(element.to_string());
            }
        }
        vec_of_compositions.push(counts);
    }
    let num_rows = vec_of_compositions.len();
    let num_cols = unique_vec_of_elems.len();
    let mut matrix = DMatrix::zeros(num_rows, num_cols);
    for (substance_i, composition) in vec_of_compositions.iter().enumerate() {
        for (j, element_j) in unique_vec_of_elems.iter().enumerate() {
            if let Some(&count) = composition.get(element_j) {
                matrix[(substance_i, j)] = count as f64;
            }
        }
    }
    info!(
        "composition matrix of {} substances over {} elements",
        num_rows, num_cols
    );
    Ok((matrix, unique_vec_of_elems))
}
