//! CAS registry numbers: `NNNNNNN-NN-R`, two to seven digits, two digits and a check
//! digit. The check digit is the sum of the other digits, read right to left and
//! weighted 1, 2, 3, ..., modulo 10.
use crate::Chemistry::chem_error::{ChemError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn cas_pattern() -> &'static Regex {
    static CAS: OnceLock<Regex> = OnceLock::new();
    CAS.get_or_init(|| Regex::new(r"^(\d{2,7})-(\d{2})-(\d)$").expect("pattern is valid"))
}

pub fn cas_check_digit(digits: &str) -> u32 {
    digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| d * (i as u32 + 1))
        .sum::<u32>()
        % 10
}

pub fn validate_cas_number(cas: &str) -> Result<()> {
    let cas = cas.trim();
    if cas.chars().filter(|&c| c != '-').count() > 10 {
        return Err(ChemError::InvalidCasNumber(format!("'{}' is too long", cas)));
    }
    let captures = cas_pattern().captures(cas).ok_or_else(|| {
        ChemError::InvalidCasNumber(format!(
            "'{}' is not formatted as x(2-7)-x(2)-x(1)",
            cas
        ))
    })?;
    let body = format!("{}{}", &captures[1], &captures[2]);
    let check_digit: u32 = captures[3]
        .parse()
        .map_err(|_| ChemError::InvalidCasNumber(format!("'{}' has no check digit", cas)))?;
    let expected = cas_check_digit(&body);
    if expected != check_digit {
        return Err(ChemError::InvalidCasNumber(format!(
            "check sum does not match check digit [{} != {}]",
            expected, check_digit
        )));
    }
    Ok(())
}

pub fn is_cas_number(cas: &str) -> bool {
    validate_cas_number(cas).is_ok()
}
