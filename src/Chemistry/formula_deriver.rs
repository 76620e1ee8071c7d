//! Percent composition and formula derivation.
//!
//! The empirical formula is found from a mass composition by turning each percentage
//! into moles, normalising against the smallest mole count and reducing the ratios to
//! whole numbers. Ratios close to an integer (within [`PERCENT_ERROR`] of the ratio) are
//! snapped to it. Other ratios are scaled: the first multiplier `k` in `2..50` that makes
//! `ratio * k` whole (at two decimals) is applied to every ratio at once. This is a
//! heuristic, not an exact rational reduction, and ratios such as 2.67 (8/3 rounded)
//! cannot be resolved by it; those are reported as [`ChemError::UnresolvedRatio`].
//!
//! The molecular formula is the empirical formula scaled by
//! `molar mass / empirical formula mass`.
use crate::Chemistry::chem_error::{ChemError, Result};
use crate::Chemistry::element_map::{
    ElementCountMap, ElementMap, MoleRatioMap, PercentCompositionMap,
};
use crate::Chemistry::molecule::{Molecule, MoleculeSource};
use crate::Chemistry::periodic_table::PeriodicTable;
use log::debug;

/// relative tolerance for snapping a mole ratio to the nearest integer
pub const PERCENT_ERROR: f64 = 0.03;
/// decimal places used when rounding is requested without a precision
pub const DEFAULT_DECIMALS: u32 = 2;
/// relative tolerance for a composition to count as summing to 1 or 100
pub const COMPOSITION_TOLERANCE: f64 = 1e-3;
/// the multiplier search tries 2..MAX_MULTIPLIER
pub const MAX_MULTIPLIER: usize = 50;

/// an f64 carries about 15 significant decimal digits, finer rounding is a no-op
pub const MAX_ROUND_DECIMALS: u32 = 15;

/// Rounds to `decimals` places; requests beyond [`MAX_ROUND_DECIMALS`] return `value`
/// unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals > MAX_ROUND_DECIMALS {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn is_near(value: f64, target: f64) -> bool {
    (value - target).abs() <= target * COMPOSITION_TOLERANCE
}

fn is_whole(value: f64) -> bool {
    round_to(value, 2).fract() == 0.0
}

/// Formula derivations against one periodic table.
#[derive(Debug, Clone, Copy)]
pub struct FormulaDeriver<'a> {
    table: &'a PeriodicTable,
}

impl<'a> FormulaDeriver<'a> {
    pub fn new(table: &'a PeriodicTable) -> Self {
        Self { table }
    }

    fn atomic_mass(&self, symbol: &str) -> Result<f64> {
        self.table
            .atomic_mass(symbol)
            .ok_or_else(|| ChemError::InvalidElement(symbol.to_string()))
    }

    /// Percent of the molar mass contributed by each element, optionally rounded to
    /// `round` decimal places.
    pub fn get_percent_composition(
        &self,
        molecule: &Molecule,
        round: Option<u32>,
    ) -> Result<PercentCompositionMap> {
        let molecular_mass = molecule.mass();
        let mut composition = PercentCompositionMap::new();
        for (symbol, &count) in molecule.elements().iter() {
            let percent = self.atomic_mass(symbol)? * count as f64 / molecular_mass * 100.0;
            let percent = match round {
                Some(decimals) => round_to(percent, decimals),
                None => percent,
            };
            composition.insert(symbol, percent);
        }
        Ok(composition)
    }

    /// [`get_percent_composition`](Self::get_percent_composition) for anything a
    /// molecule can be built from.
    pub fn get_percent_composition_of(
        &self,
        source: impl Into<MoleculeSource>,
        round: Option<u32>,
    ) -> Result<PercentCompositionMap> {
        let molecule = Molecule::build(source.into(), self.table)?;
        self.get_percent_composition(&molecule, round)
    }

    /// Smallest whole-number element ratio for a mass composition given either as
    /// fractions (summing to 1) or as percentages (summing to 100).
    pub fn get_empirical_formula(
        &self,
        percentages: &PercentCompositionMap,
    ) -> Result<ElementCountMap> {
        if percentages.is_empty() {
            return Err(ChemError::InvalidComposition("no elements given".to_string()));
        }
        if let Some((symbol, value)) = percentages
            .iter()
            .find(|(_, value)| !value.is_finite() || **value <= 0.0)
        {
            return Err(ChemError::InvalidComposition(format!(
                "share of {} must be positive, got {}",
                symbol, value
            )));
        }
        let sum: f64 = percentages.values().sum();
        let scale = if is_near(sum, 100.0) {
            1.0
        } else if is_near(sum, 1.0) {
            100.0
        } else {
            return Err(ChemError::InvalidComposition(format!(
                "shares must sum to 1 or 100, got {}",
                sum
            )));
        };

        let mut moles = MoleRatioMap::new();
        for (symbol, &value) in percentages.iter() {
            moles.insert(symbol, value * scale / self.atomic_mass(symbol)?);
        }
        let min = moles.values().cloned().fold(f64::INFINITY, f64::min);
        let mut ratio = moles.map_values(|_, &m| round_to(m / min, 2));
        debug!("mole ratios {}", ratio);

        let symbols: Vec<String> = ratio.keys().map(str::to_string).collect();
        for symbol in &symbols {
            let Some(&value) = ratio.get(symbol) else {
                continue;
            };
            if value == 1.0 {
                continue;
            }
            let nearest = value.round();
            if (nearest - value).abs() <= PERCENT_ERROR * value {
                ratio.insert(symbol.as_str(), nearest);
                continue;
            }
            if let Some(k) = (2..MAX_MULTIPLIER).find(|&k| is_whole(value * k as f64)) {
                debug!("ratio {} of {} needs multiplier {}", value, symbol, k);
                for (_, other) in ratio.iter_mut() {
                    *other *= k as f64;
                }
            }
        }

        let mut formula = ElementCountMap::new();
        for (symbol, &value) in ratio.iter() {
            let nearest = value.round();
            if nearest < 1.0 || (nearest - value).abs() > PERCENT_ERROR * value {
                return Err(ChemError::UnresolvedRatio {
                    element: symbol.to_string(),
                    ratio: value,
                });
            }
            formula.insert(symbol, nearest as usize);
        }
        debug!("empirical formula {}", formula);
        Ok(formula)
    }

    /// Element counts of a compound with molar mass `mass`, from its empirical formula
    /// or, when that is absent, from its mass composition.
    pub fn get_molecular_formula(
        &self,
        mass: f64,
        empirical_formula: Option<&ElementCountMap>,
        percentages: Option<&PercentCompositionMap>,
    ) -> Result<ElementCountMap> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(ChemError::InvalidQuantity(format!(
                "molar mass must be positive, got {}",
                mass
            )));
        }
        let empirical_formula = match (empirical_formula, percentages) {
            (Some(formula), _) => formula.clone(),
            (None, Some(percentages)) => self.get_empirical_formula(percentages)?,
            (None, None) => {
                return Err(ChemError::InvalidComposition(
                    "either an empirical formula or percentages are needed".to_string(),
                ));
            }
        };
        let empirical = Molecule::from_element_counts_with(empirical_formula, self.table)?;
        let factor = mass / empirical.mass();
        let mut molecular_formula = ElementCountMap::new();
        for (symbol, &count) in empirical.elements().iter() {
            let scaled = (count as f64 * factor).round();
            if scaled < 1.0 {
                return Err(ChemError::InvalidQuantity(format!(
                    "molar mass {} is too small for empirical formula {}",
                    mass, empirical
                )));
            }
            molecular_formula.insert(symbol, scaled as usize);
        }
        debug!("molecular formula {} for molar mass {}", molecular_formula, mass);
        Ok(molecular_formula)
    }
}

/// Percent composition with the global periodic table.
pub fn get_percent_composition(
    molecule: &Molecule,
    round: Option<u32>,
) -> Result<PercentCompositionMap> {
    FormulaDeriver::new(PeriodicTable::global()).get_percent_composition(molecule, round)
}

/// Percent composition of a formula string or element counts, with the global periodic table.
pub fn get_percent_composition_of(
    source: impl Into<MoleculeSource>,
    round: Option<u32>,
) -> Result<PercentCompositionMap> {
    FormulaDeriver::new(PeriodicTable::global()).get_percent_composition_of(source, round)
}

pub fn get_empirical_formula(percentages: &PercentCompositionMap) -> Result<ElementCountMap> {
    FormulaDeriver::new(PeriodicTable::global()).get_empirical_formula(percentages)
}

pub fn get_molecular_formula(
    mass: f64,
    empirical_formula: Option<&ElementCountMap>,
    percentages: Option<&PercentCompositionMap>,
) -> Result<ElementCountMap> {
    FormulaDeriver::new(PeriodicTable::global()).get_molecular_formula(
        mass,
        empirical_formula,
        percentages,
    )
}

/// Divides every count by `mass`. The input is left untouched.
pub fn get_percentages(mass: f64, formula: &ElementCountMap) -> Result<ElementMap<f64>> {
    if !(mass > 0.0) || !mass.is_finite() {
        return Err(ChemError::InvalidQuantity(format!(
            "mass must be positive, got {}",
            mass
        )));
    }
    Ok(formula.map_values(|_, &count| count as f64 / mass))
}

/// |actual - theoretical| / theoretical, in percent.
pub fn get_percent_error(actual: f64, theoretical: f64) -> Result<f64> {
    if theoretical == 0.0 {
        return Err(ChemError::InvalidQuantity(
            "theoretical value must not be zero".to_string(),
        ));
    }
    Ok((actual - theoretical).abs() / theoretical.abs() * 100.0)
}
