use crate::Chemistry::chem_error::{ChemError, Result};
use crate::Chemistry::element_map::ElementCountMap;
use crate::Chemistry::formula_parser::parse_formula_with;
use crate::Chemistry::periodic_table::PeriodicTable;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, Sub};

/// particles per mole
pub const AVOGADRO: f64 = 6.02214076e23;

/// name, symbol and atomic number of a molecule made of one bare element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementIdentity {
    pub name: String,
    pub symbol: String,
    pub atomic_number: u32,
}

/// What a [`Molecule`] is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum MoleculeSource {
    /// element symbol, name or atomic number, e.g. "Fe", "iron", "26"
    SymbolOrName(String),
    /// already parsed element counts
    ElementCounts(ElementCountMap),
    /// formula string, e.g. "Ca(OH)2"
    Formula(String),
}

impl From<&str> for MoleculeSource {
    fn from(formula: &str) -> Self {
        MoleculeSource::Formula(formula.to_string())
    }
}

impl From<String> for MoleculeSource {
    fn from(formula: String) -> Self {
        MoleculeSource::Formula(formula)
    }
}

impl From<ElementCountMap> for MoleculeSource {
    fn from(counts: ElementCountMap) -> Self {
        MoleculeSource::ElementCounts(counts)
    }
}

/// Element counts with the molar mass and the number of atoms derived from them.
/// Derived values are computed once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    elements: ElementCountMap,
    /// g/mol
    mass: f64,
    /// atoms per formula unit
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<ElementIdentity>,
}

impl Molecule {
    pub fn build(source: MoleculeSource, table: &PeriodicTable) -> Result<Self> {
        match source {
            MoleculeSource::SymbolOrName(token) => Self::from_symbol_or_name_with(&token, table),
            MoleculeSource::ElementCounts(counts) => Self::from_element_counts_with(counts, table),
            MoleculeSource::Formula(formula) => Self::from_formula_string_with(&formula, table),
        }
    }

    pub fn from_symbol_or_name(token: &str) -> Result<Self> {
        Self::from_symbol_or_name_with(token, PeriodicTable::global())
    }

    pub fn from_element_counts(counts: ElementCountMap) -> Result<Self> {
        Self::from_element_counts_with(counts, PeriodicTable::global())
    }

    pub fn from_formula_string(formula: &str) -> Result<Self> {
        Self::from_formula_string_with(formula, PeriodicTable::global())
    }

    /// A single atom of the element matching `token` (symbol, name or atomic number).
    pub fn from_symbol_or_name_with(token: &str, table: &PeriodicTable) -> Result<Self> {
        let element = table
            .lookup(token.trim())
            .ok_or_else(|| ChemError::InvalidElement(token.to_string()))?;
        Ok(Self {
            elements: ElementCountMap::from([(element.symbol.as_str(), 1)]),
            mass: element.atomic_mass,
            count: 1,
            identity: Some(ElementIdentity {
                name: element.name.clone(),
                symbol: element.symbol.clone(),
                atomic_number: element.atomic_number,
            }),
        })
    }

    pub fn from_element_counts_with(
        counts: ElementCountMap,
        table: &PeriodicTable,
    ) -> Result<Self> {
        if counts.is_empty() {
            return Err(ChemError::invalid_formula("", "no elements given"));
        }
        let mut mass = 0.0;
        let mut count = 0;
        for (symbol, &n) in counts.iter() {
            let atomic_mass = table
                .atomic_mass(symbol)
                .ok_or_else(|| ChemError::InvalidElement(symbol.to_string()))?;
            if n == 0 {
                return Err(ChemError::invalid_formula(
                    &counts.to_string(),
                    format!("count of {} must be positive", symbol),
                ));
            }
            mass += atomic_mass * n as f64;
            count += n;
        }
        Ok(Self {
            elements: counts,
            mass,
            count,
            identity: None,
        })
    }

    pub fn from_formula_string_with(formula: &str, table: &PeriodicTable) -> Result<Self> {
        let counts = parse_formula_with(formula, table)?;
        Self::from_element_counts_with(counts, table)
    }

    pub fn elements(&self) -> &ElementCountMap {
        &self.elements
    }

    /// molar mass, g/mol
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// atoms per formula unit
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn identity(&self) -> Option<&ElementIdentity> {
        self.identity.as_ref()
    }

    ///////////////////////////CONVERSIONS//////////////////////////////////////
    /// atoms in `sample_mass` grams
    pub fn to_atoms(&self, sample_mass: f64) -> f64 {
        self.to_particles(sample_mass) * self.count as f64
    }

    /// formula units (not atoms) in `sample_mass` grams
    pub fn to_particles(&self, sample_mass: f64) -> f64 {
        self.to_moles(sample_mass) * AVOGADRO
    }

    pub fn to_moles(&self, sample_mass: f64) -> f64 {
        sample_mass / self.mass
    }

    pub fn moles_to_mass(&self, moles: f64) -> f64 {
        moles * self.mass
    }

    pub fn atoms_to_mass(&self, atoms: f64) -> f64 {
        self.atoms_to_moles(atoms) * self.mass
    }

    pub fn particles_to_mass(&self, particles: f64) -> f64 {
        particles / AVOGADRO * self.mass
    }

    pub fn moles_to_atoms(&self, moles: f64) -> f64 {
        moles * AVOGADRO * self.count as f64
    }

    pub fn atoms_to_moles(&self, atoms: f64) -> f64 {
        atoms / AVOGADRO / self.count as f64
    }

    /// Symbols with their counts (a count of 1 is omitted) in the order of the element
    /// map. No canonical ordering is applied.
    pub fn to_formula(&self) -> String {
        let mut formula = String::new();
        for (symbol, &count) in self.elements.iter() {
            formula.push_str(symbol);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        }
        formula
    }

    /// The molecule with every count multiplied by `factor`.
    pub fn scaled(&self, factor: usize) -> Result<Self> {
        if factor == 0 {
            return Err(ChemError::InvalidQuantity(
                "scale factor must be positive".to_string(),
            ));
        }
        let overflow = || {
            ChemError::InvalidQuantity(format!("{} scaled by {} overflows", self, factor))
        };
        let mut elements = ElementCountMap::new();
        for (symbol, &n) in self.elements.iter() {
            elements.insert(symbol, n.checked_mul(factor).ok_or_else(overflow)?);
        }
        Ok(Self {
            elements,
            mass: self.mass * factor as f64,
            count: self.count.checked_mul(factor).ok_or_else(overflow)?,
            identity: None,
        })
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formula())
    }
}

/// Merges the element counts of two molecules.
impl Add for &Molecule {
    type Output = Result<Molecule>;

    fn add(self, other: &Molecule) -> Result<Molecule> {
        let overflow = || ChemError::InvalidQuantity(format!("{} + {} overflows", self, other));
        let mut elements = self.elements.clone();
        for (symbol, &n) in other.elements.iter() {
            match elements.get_mut(symbol) {
                Some(existing) => *existing = existing.checked_add(n).ok_or_else(overflow)?,
                None => {
                    elements.insert(symbol, n);
                }
            }
        }
        Ok(Molecule {
            elements,
            mass: self.mass + other.mass,
            count: self.count.checked_add(other.count).ok_or_else(overflow)?,
            identity: None,
        })
    }
}

/// Removes the atoms of `other`. An element whose count reaches zero is dropped; taking
/// away atoms that are not there, or every atom, is an error.
impl Sub for &Molecule {
    type Output = Result<Molecule>;

    fn sub(self, other: &Molecule) -> Result<Molecule> {
        let mut elements = ElementCountMap::new();
        for (symbol, &n) in self.elements.iter() {
            let removed = other.elements.get(symbol).copied().unwrap_or(0);
            let left = n.checked_sub(removed).ok_or_else(|| {
                ChemError::InvalidQuantity(format!(
                    "cannot remove {} {} from {}",
                    removed, symbol, self
                ))
            })?;
            if left > 0 {
                elements.insert(symbol, left);
            }
        }
        if let Some(missing) = other.elements.keys().find(|s| !self.elements.contains_key(s)) {
            return Err(ChemError::InvalidQuantity(format!(
                "{} has no {} to remove",
                self, missing
            )));
        }
        if elements.is_empty() {
            return Err(ChemError::InvalidQuantity(format!(
                "{} - {} leaves no atoms",
                self, other
            )));
        }
        let count = elements.values().sum();
        Ok(Molecule {
            elements,
            mass: self.mass - other.mass,
            count,
            identity: None,
        })
    }
}
