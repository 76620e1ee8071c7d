////////////////////////PRETTY PRINTING/////////////////////////////
use crate::Chemistry::element_map::PercentCompositionMap;
use crate::Chemistry::molecule::Molecule;
use crate::Chemistry::periodic_table::{PeriodicElement, PeriodicTable};
use prettytable::{Table, row};

/// Card of one element: name, symbol, atomic number and atomic mass.
pub fn element_card(element: &PeriodicElement) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Property", "Value", "Units"]);
    table.add_row(row!["Element", element.name, ""]);
    table.add_row(row!["Symbol", element.symbol, ""]);
    table.add_row(row!["Atomic number", element.atomic_number, ""]);
    table.add_row(row![
        "Atomic mass",
        format!("{:.4}", element.atomic_mass),
        "g/mol"
    ]);
    table
}

pub fn composition_table(molecule: &Molecule, percentages: &PercentCompositionMap) -> Table {
    composition_table_with(molecule, percentages, PeriodicTable::global())
}

/// Table with one row per element of the molecule (atoms, mass contribution, mass
/// percent) and a closing total row.
pub fn composition_table_with(
    molecule: &Molecule,
    percentages: &PercentCompositionMap,
    periodic_table: &PeriodicTable,
) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Element", "Atoms", "Mass, g/mol", "Mass %"]);
    for (symbol, &count) in molecule.elements() {
        let contribution = periodic_table
            .atomic_mass(symbol)
            .map(|mass| format!("{:.4}", mass * count as f64))
            .unwrap_or_else(|| "-".to_string());
        let percent = percentages
            .get(symbol)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![symbol, count, contribution, percent]);
    }
    table.add_row(row![
        "Total",
        molecule.count(),
        format!("{:.4}", molecule.mass()),
        format!("{:.2}", percentages.values().sum::<f64>())
    ]);
    table
}

pub fn pretty_print_element(element: &PeriodicElement) {
    println!("\n=== {} ===", element.name.to_uppercase());
    element_card(element).printstd();
}

pub fn pretty_print_composition(molecule: &Molecule, percentages: &PercentCompositionMap) {
    println!("\n=== COMPOSITION OF {} ===", molecule.to_formula());
    composition_table(molecule, percentages).printstd();
}
