//! Parsing of chemical formulae into atomic composition
//!
//! A formula like `Ca(NO3)2` is turned into the element -> count map
//! `{"Ca":1, "N":2, "O":6}` together with a canonical display string where counts
//! equal to 1 are omitted (`H2O1` is displayed as `H2O`).
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// error types for formula parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    #[error("formula '{0}' contains no element tokens")]
    Empty(String),
    #[error("unexpected symbol '{symbol}' at position {position} in formula '{formula}'")]
    UnexpectedSymbol {
        formula: String,
        position: usize,
        symbol: char,
    },
    #[error("count '{count}' of '{element}' in formula '{formula}' is not a positive integer")]
    NonPositiveCount {
        formula: String,
        element: String,
        count: String,
    },
    #[error("unbalanced bracket in formula '{0}'")]
    UnbalancedBracket(String),
    #[error("number of '{element}' atoms in formula '{formula}' is too large")]
    CountOverflow { formula: String, element: String },
}

// element symbol with optional count, opening bracket, closing bracket with optional multiplier
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<elem>[A-Z][a-z]*)(?P<count>\d*)|(?P<open>[\(\[])|(?P<close>[\)\]])(?P<mult>\d*)")
        .expect("token regex is valid")
});
// phase marks like H2O(g), NaCl(s), HCl(aq) at the end of the formula
static PHASE_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\((g|l|s|c|aq)\)$").expect("phase regex is valid")
});

/// Parsed chemical formula. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    formula_raw: String,
    element_counts: BTreeMap<String, usize>,
    formula_canonical: String,
}

impl Species {
    pub fn parse(formula: &str) -> Result<Species, FormulaError> {
        let cleaned: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = PHASE_MARK.replace(&cleaned, "").to_string();
        if cleaned.is_empty() {
            return Err(FormulaError::Empty(formula.to_string()));
        }
        // counts of the innermost open group, enclosing levels wait on the stack
        let mut current: BTreeMap<String, usize> = BTreeMap::new();
        let mut stack: Vec<BTreeMap<String, usize>> = Vec::new();
        let mut canonical = String::with_capacity(cleaned.len());
        let mut position = 0;
        for caps in TOKEN.captures_iter(&cleaned) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() != position {
                return Err(unexpected(formula, &cleaned, position));
            }
            position = whole.end();

            if let Some(elem) = caps.name("elem") {
                let element = elem.as_str();
                let count = parse_count(formula, element, caps.name("count").map(|m| m.as_str()))?;
                add_atoms(formula, &mut current, element, count)?;
                canonical.push_str(element);
                if count > 1 {
                    canonical.push_str(&count.to_string());
                }
            } else if caps.name("open").is_some() {
                stack.push(std::mem::take(&mut current));
                canonical.push('(');
            } else if caps.name("close").is_some() {
                let Some(mut parent) = stack.pop() else {
                    return Err(FormulaError::UnbalancedBracket(formula.to_string()));
                };
                let multiplier = parse_count(formula, ")", caps.name("mult").map(|m| m.as_str()))?;
                for (element, count) in std::mem::take(&mut current) {
                    let scaled = count.checked_mul(multiplier).ok_or_else(|| {
                        FormulaError::CountOverflow {
                            formula: formula.to_string(),
                            element: element.clone(),
                        }
                    })?;
                    add_atoms(formula, &mut parent, &element, scaled)?;
                }
                current = parent;
                canonical.push(')');
                if multiplier > 1 {
                    canonical.push_str(&multiplier.to_string());
                }
            }
        }
        if position != cleaned.len() {
            return Err(unexpected(formula, &cleaned, position));
        }
        if !stack.is_empty() {
            return Err(FormulaError::UnbalancedBracket(formula.to_string()));
        }
        let element_counts = current;
        if element_counts.is_empty() {
            return Err(FormulaError::Empty(formula.to_string()));
        }
        debug!("formula {} parsed into {:?}", formula, element_counts);
        Ok(Species {
            formula_raw: formula.to_string(),
            element_counts,
            formula_canonical: canonical,
        })
    }

    pub fn formula_raw(&self) -> &str {
        &self.formula_raw
    }

    pub fn formula_canonical(&self) -> &str {
        &self.formula_canonical
    }

    pub fn element_counts(&self) -> &BTreeMap<String, usize> {
        &self.element_counts
    }

    /// number of atoms of the element, 0 if absent
    pub fn count_of(&self, element: &str) -> usize {
        self.element_counts.get(element).copied().unwrap_or(0)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.element_counts.keys().map(|e| e.as_str())
    }
}

fn parse_count(formula: &str, element: &str, digits: Option<&str>) -> Result<usize, FormulaError> {
    match digits {
        None | Some("") => Ok(1),
        Some(digits) => match digits.parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(FormulaError::NonPositiveCount {
                formula: formula.to_string(),
                element: element.to_string(),
                count: digits.to_string(),
            }),
        },
    }
}

fn add_atoms(
    formula: &str,
    counts: &mut BTreeMap<String, usize>,
    element: &str,
    count: usize,
) -> Result<(), FormulaError> {
    let total = counts.entry(element.to_string()).or_insert(0);
    *total = total
        .checked_add(count)
        .ok_or_else(|| FormulaError::CountOverflow {
            formula: formula.to_string(),
            element: element.to_string(),
        })?;
    Ok(())
}

fn unexpected(formula: &str, cleaned: &str, position: usize) -> FormulaError {
    FormulaError::UnexpectedSymbol {
        formula: formula.to_string(),
        position,
        symbol: cleaned[position..].chars().next().unwrap_or(' '),
    }
}

impl FromStr for Species {
    type Err = FormulaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::parse(s)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula_canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(e, c)| (e.to_string(), *c)).collect()
    }

    #[test]
    fn test_parse_simple_formulae() {
        let water = Species::parse("H2O").unwrap();
        assert_eq!(water.element_counts(), &counts(&[("H", 2), ("O", 1)]));
        assert_eq!(water.formula_canonical(), "H2O");
        assert_eq!(water.formula_raw(), "H2O");

        let explicit = Species::parse("H2O1").unwrap();
        assert_eq!(explicit.element_counts(), water.element_counts());
        assert_eq!(explicit.formula_canonical(), "H2O");

        let salt = Species::parse("NaCl").unwrap();
        assert_eq!(salt.element_counts(), &counts(&[("Na", 1), ("Cl", 1)]));
        assert_eq!(salt.count_of("Cl"), 1);
        assert_eq!(salt.count_of("O"), 0);
    }

    #[test]
    fn test_repeated_elements_accumulate() {
        let acetic = Species::parse("CH3COOH").unwrap();
        assert_eq!(acetic.element_counts(), &counts(&[("C", 2), ("H", 4), ("O", 2)]));
        assert_eq!(acetic.formula_canonical(), "CH3COOH");
    }

    #[test]
    fn test_brackets() {
        let nitrate = Species::parse("Ca(NO3)2").unwrap();
        assert_eq!(nitrate.element_counts(), &counts(&[("Ca", 1), ("N", 2), ("O", 6)]));
        assert_eq!(nitrate.formula_canonical(), "Ca(NO3)2");

        let nested = Species::parse("K4[Fe(CN)6]").unwrap();
        assert_eq!(nested.element_counts(), &counts(&[("K", 4), ("Fe", 1), ("C", 6), ("N", 6)]));
    }

    #[test]
    fn test_phase_marks_and_spaces() {
        let vapour = Species::parse(" H2 O(g)").unwrap();
        assert_eq!(vapour.element_counts(), &counts(&[("H", 2), ("O", 1)]));
        let acid = Species::parse("HCl(aq)").unwrap();
        assert_eq!(acid.formula_canonical(), "HCl");
    }

    #[test]
    fn test_invalid_formulae() {
        assert!(matches!(Species::parse(""), Err(FormulaError::Empty(_))));
        assert!(matches!(Species::parse("   "), Err(FormulaError::Empty(_))));
        assert!(matches!(Species::parse("()"), Err(FormulaError::Empty(_))));
        assert!(matches!(
            Species::parse("H0"),
            Err(FormulaError::NonPositiveCount { .. })
        ));
        assert!(matches!(
            Species::parse("h2o"),
            Err(FormulaError::UnexpectedSymbol { position: 0, symbol: 'h', .. })
        ));
        assert!(matches!(
            Species::parse("2H"),
            Err(FormulaError::UnexpectedSymbol { position: 0, .. })
        ));
        assert!(matches!(
            Species::parse("H2-O"),
            Err(FormulaError::UnexpectedSymbol { position: 2, symbol: '-', .. })
        ));
        assert!(matches!(
            Species::parse("Ca(NO3"),
            Err(FormulaError::UnbalancedBracket(_))
        ));
        assert!(matches!(
            Species::parse("NO3)2"),
            Err(FormulaError::UnbalancedBracket(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_atom_count_overflow() {
        assert!(matches!(
            Species::parse("(H4294967296)4294967296"),
            Err(FormulaError::CountOverflow { ref element, .. }) if element == "H"
        ));
        let huge = format!("H{}H", usize::MAX);
        assert!(matches!(
            Species::parse(&huge),
            Err(FormulaError::CountOverflow { .. })
        ));
        // large but representable counts are fine
        let big = Species::parse("(H65536)65536").unwrap();
        assert_eq!(big.count_of("H"), 65536 * 65536);
    }

    #[test]
    fn test_from_str_and_display() {
        let species: Species = "O2".parse().unwrap();
        assert_eq!(species.to_string(), "O2");
    }
}
