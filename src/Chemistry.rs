/// Error type shared by the whole chemistry toolkit
pub mod chem_error;
/// Insertion-ordered map from element symbol to a value (counts, percentages, ratios)
pub mod element_map;
/// Element records and the process-wide periodic table, loaded once from a JSON dataset
pub mod periodic_table;
/// Parsing of formula strings like `Ca(OH)2` into element counts
pub mod formula_parser;
/// Molecule built from a symbol or name, from element counts or from a formula string;
/// mass/moles/particles/atoms conversions
pub mod molecule;
/// Percent composition, empirical formula from percentages, molecular formula from
/// molar mass
pub mod formula_deriver;
/// Molar masses of lists of substances and the element composition matrix
pub mod molmass;
/// CAS registry number check
pub mod cas_number;
/// prettytable renderings of element cards and composition tables
pub mod chem_output;
