//! Parsing of chemical formulae into element counts
//!
//! A formula is a run of element symbols (uppercase letter plus an optional lowercase
//! letter), each followed by an optional count, with at most one level of parenthesised
//! groups that carry a multiplier after the closing bracket: `H2O`, `Ca(OH)2`,
//! `(NH4)2SO4`. Elements appearing several times are summed.
use crate::Chemistry::chem_error::{ChemError, Result};
use crate::Chemistry::element_map::ElementCountMap;
use crate::Chemistry::periodic_table::PeriodicTable;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn disallowed_characters() -> &'static Regex {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9()]").expect("pattern is valid"))
}

/// piece of a formula sharing one multiplier: text outside brackets (multiplier 1)
/// or the inside of a group with the number after its closing bracket
#[derive(Debug, PartialEq)]
struct Segment<'a> {
    text: &'a str,
    multiplier: usize,
}

/// Parses a formula with the global periodic table.
pub fn parse_formula(formula: &str) -> Result<ElementCountMap> {
    parse_formula_with(formula, PeriodicTable::global())
}

/// Parses a formula, resolving symbols in `table`.
pub fn parse_formula_with(formula: &str, table: &PeriodicTable) -> Result<ElementCountMap> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(ChemError::invalid_formula(formula, "formula is empty"));
    }
    if let Some(found) = disallowed_characters().find(formula) {
        return Err(ChemError::invalid_formula(
            formula,
            format!("character '{}' is not allowed", found.as_str()),
        ));
    }

    let mut counts = ElementCountMap::new();
    for segment in split_segments(formula)? {
        for (symbol, count) in tokenize_segment(formula, segment.text, table)? {
            let total = count.checked_mul(segment.multiplier).ok_or_else(|| {
                ChemError::invalid_formula(formula, format!("count of {} overflows", symbol))
            })?;
            match counts.get_mut(symbol) {
                Some(existing) => {
                    *existing = existing.checked_add(total).ok_or_else(|| {
                        ChemError::invalid_formula(
                            formula,
                            format!("count of {} overflows", symbol),
                        )
                    })?;
                }
                None => {
                    counts.insert(symbol, total);
                }
            }
        }
    }
    debug!("parsed formula {} into {}", formula, counts);
    Ok(counts)
}

// the formula is ASCII-only here, byte offsets are char offsets
fn split_segments(formula: &str) -> Result<Vec<Segment<'_>>> {
    let bytes = formula.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut group_start: Option<usize> = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                if group_start.is_some() {
                    return Err(ChemError::invalid_formula(
                        formula,
                        "nested parentheses are not supported",
                    ));
                }
                if start < i {
                    segments.push(Segment {
                        text: &formula[start..i],
                        multiplier: 1,
                    });
                }
                group_start = Some(i + 1);
                i += 1;
            }
            b')' => {
                let open = group_start.take().ok_or_else(|| {
                    ChemError::invalid_formula(formula, format!("unmatched ')' at position {}", i))
                })?;
                let text = &formula[open..i];
                if text.is_empty() {
                    return Err(ChemError::invalid_formula(formula, "empty group '()'"));
                }
                let (multiplier, end) = read_number(formula, i + 1)?;
                segments.push(Segment {
                    text,
                    multiplier: multiplier.unwrap_or(1),
                });
                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    if let Some(open) = group_start {
        return Err(ChemError::invalid_formula(
            formula,
            format!("unmatched '(' at position {}", open - 1),
        ));
    }
    if start < bytes.len() {
        segments.push(Segment {
            text: &formula[start..],
            multiplier: 1,
        });
    }
    Ok(segments)
}

/// Reads the digit run starting at `from`. Returns the number (None if there are no
/// digits) and the position after the run. Zero is rejected.
fn read_number(text: &str, from: usize) -> Result<(Option<usize>, usize)> {
    let bytes = text.as_bytes();
    let mut end = from;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == from {
        return Ok((None, end));
    }
    let digits = &text[from..end];
    let number: usize = digits
        .parse()
        .map_err(|_| ChemError::invalid_formula(text, format!("number {} is too large", digits)))?;
    if number == 0 {
        return Err(ChemError::invalid_formula(text, "counts must be positive"));
    }
    Ok((Some(number), end))
}

fn tokenize_segment<'a>(
    formula: &str,
    text: &'a str,
    table: &PeriodicTable,
) -> Result<Vec<(&'a str, usize)>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_uppercase() {
            let mut end = i + 1;
            if end < bytes.len() && bytes[end].is_ascii_lowercase() {
                end += 1;
            }
            let symbol = &text[i..end];
            if table.by_symbol(symbol).is_none() {
                return Err(ChemError::invalid_formula(
                    formula,
                    format!("unknown element symbol '{}'", symbol),
                ));
            }
            let (count, after) = read_number(text, end).map_err(|e| match e {
                ChemError::InvalidFormula { reason, .. } => {
                    ChemError::invalid_formula(formula, reason)
                }
                other => other,
            })?;
            tokens.push((symbol, count.unwrap_or(1)));
            i = after;
        } else if c.is_ascii_lowercase() {
            return Err(ChemError::invalid_formula(
                formula,
                format!("'{}' does not start an element symbol", c as char),
            ));
        } else {
            return Err(ChemError::invalid_formula(
                formula,
                "a count must follow an element symbol or a group",
            ));
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(formula: &str) -> Result<ElementCountMap> {
        parse_formula_with(formula, &PeriodicTable::embedded().unwrap())
    }

    fn assert_invalid(formula: &str) {
        match parse(formula) {
            Err(ChemError::InvalidFormula { .. }) => {}
            other => panic!("expected InvalidFormula for {:?}, got {:?}", formula, other),
        }
    }

    #[test]
    fn test_parse_formula() {
        let expected_counts = ElementCountMap::from([("C", 6), ("H", 8), ("O", 6)]);
        assert_eq!(parse("C6H8O6").unwrap(), expected_counts);

        let expected_counts = ElementCountMap::from([("Na", 1), ("N", 2), ("O", 6)]);
        assert_eq!(parse("Na(NO3)2").unwrap(), expected_counts);

        let expected_counts = ElementCountMap::from([("H", 2), ("O", 1)]);
        assert_eq!(parse("H2O").unwrap(), expected_counts);

        let expected_counts = ElementCountMap::from([("C", 5), ("H", 7), ("O", 2)]);
        assert_eq!(parse("C5H6OOH").unwrap(), expected_counts);
    }

    #[test]
    fn test_with_groups() {
        let expected_counts = ElementCountMap::from([("Ca", 1), ("O", 2), ("H", 2)]);
        assert_eq!(parse("Ca(OH)2").unwrap(), expected_counts);

        let expected_counts = ElementCountMap::from([("N", 2), ("H", 8), ("S", 1), ("O", 4)]);
        assert_eq!(parse("(NH4)2SO4").unwrap(), expected_counts);

        let expected_counts = ElementCountMap::from([("Mg", 3), ("P", 2), ("O", 8)]);
        assert_eq!(parse("Mg3(PO4)2").unwrap(), expected_counts);

        // group without multiplier and the same element inside and outside a group
        let expected_counts = ElementCountMap::from([("C", 8), ("H", 10)]);
        assert_eq!(parse("C6H4(CH3)2").unwrap(), expected_counts);
        assert_eq!(
            parse("Na(OH)").unwrap(),
            ElementCountMap::from([("Na", 1), ("O", 1), ("H", 1)])
        );

        // two groups, multi-digit multiplier
        let expected_counts = ElementCountMap::from([("Fe", 4), ("C", 18), ("N", 18)]);
        assert_eq!(parse("Fe4(CN)12(CN)6").unwrap(), expected_counts);
        assert_eq!(
            parse("(CH2)12").unwrap(),
            ElementCountMap::from([("C", 12), ("H", 24)])
        );
    }

    #[test]
    fn test_multi_digit_counts() {
        let expected_counts = ElementCountMap::from([("C", 12), ("H", 22), ("O", 11)]);
        assert_eq!(parse("C12H22O11").unwrap(), expected_counts);
        assert_eq!(
            parse("C100H202").unwrap(),
            ElementCountMap::from([("C", 100), ("H", 202)])
        );
    }

    #[test]
    fn test_order_of_first_appearance() {
        let counts = parse("OH(OH)2H").unwrap();
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["O", "H"]);
        assert_eq!(counts.get("O"), Some(&3));
        assert_eq!(counts.get("H"), Some(&4));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            parse("  H2O \n").unwrap(),
            ElementCountMap::from([("H", 2), ("O", 1)])
        );
    }

    #[test]
    fn test_invalid_formulae() {
        assert_invalid("Zz2");
        assert_invalid("H2(O");
        assert_invalid("H2O)");
        assert_invalid(")H2O(");
        assert_invalid("K((OH)2)3");
        assert_invalid("H2O!");
        assert_invalid("H 2O");
        assert_invalid("");
        assert_invalid("   ");
        assert_invalid("()2");
        assert_invalid("H0");
        assert_invalid("(OH)0");
        assert_invalid("2H");
        assert_invalid("h2o");
        assert_invalid("J");
        assert_invalid("H99999999999999999999999");
    }

    #[test]
    fn test_error_reports_formula_and_reason() {
        let err = parse("CaZz").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("CaZz"));
        assert!(message.contains("Zz"));
    }

    #[test]
    fn test_custom_table() {
        let json = r#"[
            {"Element": "Hydrogen", "Symbol": "H", "AtomicNumber": 1, "AtomicMass": 1.008},
            {"Element": "Oxygen", "Symbol": "O", "AtomicNumber": 8, "AtomicMass": 15.999}
        ]"#;
        let table = PeriodicTable::from_json_str(json).unwrap();
        assert!(parse_formula_with("H2O2", &table).is_ok());
        assert!(parse_formula_with("NaCl", &table).is_err());
    }

    #[test]
    fn test_split_segments() {
        let segments = split_segments("Ca(OH)2Cl").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment { text: "Ca", multiplier: 1 },
                Segment { text: "OH", multiplier: 2 },
                Segment { text: "Cl", multiplier: 1 },
            ]
        );
    }

    #[test]
    fn test_global_parse() {
        assert_eq!(
            parse_formula("NaCl").unwrap(),
            ElementCountMap::from([("Na", 1), ("Cl", 1)])
        );
    }
}
