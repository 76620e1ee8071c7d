use crate::Chemistry::cas_number::validate_cas_number;
use crate::Chemistry::chem_output::{pretty_print_composition, pretty_print_element};
use crate::Chemistry::element_map::{ElementCountMap, PercentCompositionMap};
use crate::Chemistry::formula_deriver::{
    get_empirical_formula, get_molecular_formula, get_percent_composition, get_percent_error,
    get_percentages,
};
use crate::Chemistry::formula_parser::parse_formula;
use crate::Chemistry::molecule::Molecule;
use crate::Chemistry::molmass::{
    calculate_molar_mass, calculate_molar_mass_of_vector_of_subs, create_elem_composition_matrix,
};
use crate::Chemistry::periodic_table::PeriodicTable;
use crate::settings::with_config;
use log::error;

pub fn chem_examples(task: usize) {
    let decimals = with_config(|manager| manager.get_config().decimals);
    match task {
        0 => {
            // Parsing of formulae, molar masses and matrix of atomic composition
            let formula = "C6H8O6";
            match calculate_molar_mass(formula) {
                Ok((molar_mass, element_composition)) => {
                    println!("Element counts: {}", element_composition);
                    println!("Molar mass: {:.4} g/mol", molar_mass);
                }
                Err(e) => error!("{}", e),
            }
            for formula in ["Na(NO3)2", "(NH4)2SO4", "Mg(OH", "K((OH)2)3"] {
                match parse_formula(formula) {
                    Ok(counts) => println!("{} -> {}", formula, counts),
                    Err(e) => println!("{} -> {}", formula, e),
                }
            }
            let vec_of_formulae = vec!["H2O", "NaCl", "C6H8O6", "Ca(NO3)2"];
            if let Ok(masses) = calculate_molar_mass_of_vector_of_subs(&vec_of_formulae) {
                for (formula, mass) in vec_of_formulae.iter().zip(masses) {
                    println!("molar mass of {}: {:.3} g/mol", formula, mass);
                }
            }
            let vec_of_formulae = vec!["H2O", "NaCl", "C3H8", "CH4"];
            match create_elem_composition_matrix(&vec_of_formulae) {
                Ok((matrix, elements)) => println!("{:?}{}", elements, matrix),
                Err(e) => error!("{}", e),
            }
        }
        1 => {
            // Molecules: three ways to build one, sample conversions
            let iron = match Molecule::from_symbol_or_name("iron") {
                Ok(iron) => iron,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            if let Some(element) = PeriodicTable::global().lookup("Fe") {
                pretty_print_element(element);
            }
            println!("100 g of {} = {:.4} mol", iron, iron.to_moles(100.0));
            println!("100 g of {} = {:.4e} atoms", iron, iron.to_atoms(100.0));

            let counts = ElementCountMap::from([("C", 6), ("H", 12), ("O", 6)]);
            if let Ok(glucose) = Molecule::from_element_counts(counts) {
                println!(
                    "{}: {:.3} g/mol, {} atoms per molecule",
                    glucose,
                    glucose.mass(),
                    glucose.count()
                );
                println!("0.5 mol of {} = {:.3} g", glucose, glucose.moles_to_mass(0.5));
                println!(
                    "1 g of {} = {:.4e} molecules",
                    glucose,
                    glucose.to_particles(1.0)
                );
            }
            if let (Ok(hydrogen), Ok(oxygen)) = (
                Molecule::from_formula_string("H2"),
                Molecule::from_symbol_or_name("O"),
            ) {
                match &hydrogen + &oxygen {
                    Ok(water) => println!("H2 + O = {} ({:.3} g/mol)", water, water.mass()),
                    Err(e) => error!("{}", e),
                }
            }
        }
        2 => {
            // Percent composition by mass
            for formula in ["H2O", "NaCl", "Ca(OH)2", "C12H22O11"] {
                let result = Molecule::from_formula_string(formula).and_then(|molecule| {
                    get_percent_composition(&molecule, Some(decimals))
                        .map(|percentages| (molecule, percentages))
                });
                match result {
                    Ok((molecule, percentages)) => {
                        pretty_print_composition(&molecule, &percentages)
                    }
                    Err(e) => error!("{}", e),
                }
            }
        }
        3 => {
            // Empirical and molecular formulae from mass composition
            let percentages = PercentCompositionMap::from([("C", 40.0), ("H", 6.67), ("O", 53.3)]);
            match get_empirical_formula(&percentages) {
                Ok(empirical) => println!("empirical formula of {}: {}", percentages, empirical),
                Err(e) => error!("{}", e),
            }
            match get_molecular_formula(180.16, None, Some(&percentages)) {
                Ok(molecular) => {
                    println!("molecular formula for 180.16 g/mol: {}", molecular);
                    if let Ok(ratios) = get_percentages(180.16, &molecular) {
                        println!("atoms per g/mol: {}", ratios);
                    }
                }
                Err(e) => error!("{}", e),
            }
            let iron_oxide = PercentCompositionMap::from([("Fe", 69.94), ("O", 30.06)]);
            match get_empirical_formula(&iron_oxide) {
                Ok(formula) => println!("empirical formula of {}: {}", iron_oxide, formula),
                Err(e) => error!("{}", e),
            }
            // propane: H/C = 2.67 cannot be resolved by rounding the ratio
            let propane = PercentCompositionMap::from([("C", 81.71), ("H", 18.29)]);
            if let Err(e) = get_empirical_formula(&propane) {
                println!("{}", e);
            }
            if let Ok(error) = get_percent_error(17.5, 18.015) {
                println!("percent error of 17.5 vs 18.015: {:.2} %", error);
            }
        }
        4 => {
            // CAS registry numbers
            for cas in ["7732-18-5", "64-17-5", "7732-18-4", "7-18-5"] {
                match validate_cas_number(cas) {
                    Ok(()) => println!("{} is a valid CAS number", cas),
                    Err(e) => println!("{}", e),
                }
            }
        }
        _ => {
            println!("no example with number {}", task);
        }
    }
}
