//! Input reader (C13): parses the factor-profile file and an optional
//! partial-array file, applying every rejection rule from §6 before the
//! engine ever enumerates a single Interaction.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{PropertyMode, Row};

/// A validated factor profile: `levels.len() == C`.
pub struct FactorProfile {
    pub levels: Vec<usize>,
}

/// Reads and validates the two-line factor-profile file, then checks the
/// combinatorial parameters `(t, d, delta)` against `mode` per §6.
pub fn read_input_file(path: &str, t: u64, d: u64, delta: u64, mode: PropertyMode) -> Result<FactorProfile> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    let c_line = lines.next().ok_or_else(|| Error::InputSyntax {
        file: path.to_string(),
        line: 1,
        expected: "column count C".to_string(),
        actual: "<empty file>".to_string(),
    })?;
    let c: usize = c_line.trim().parse().map_err(|_| Error::InputSyntax {
        file: path.to_string(),
        line: 1,
        expected: "a positive integer column count".to_string(),
        actual: c_line.to_string(),
    })?;
    if c == 0 {
        return Err(Error::ParameterInfeasible { rule: "column count C must be positive".to_string() });
    }

    let levels_line = lines.next().ok_or_else(|| Error::InputSyntax {
        file: path.to_string(),
        line: 2,
        expected: format!("{c} level bounds"),
        actual: "<missing line>".to_string(),
    })?;
    let tokens: Vec<&str> = levels_line.split_whitespace().collect();
    if tokens.len() != c {
        return Err(Error::InputSyntax {
            file: path.to_string(),
            line: 2,
            expected: format!("{c} level bounds"),
            actual: format!("{} tokens", tokens.len()),
        });
    }
    let mut levels = Vec::with_capacity(c);
    for tok in tokens {
        let level: usize = tok.parse().map_err(|_| Error::InputSyntax {
            file: path.to_string(),
            line: 2,
            expected: "a positive integer level bound".to_string(),
            actual: tok.to_string(),
        })?;
        levels.push(level);
    }

    validate_parameters(c, &levels, t, d, delta, mode)?;
    Ok(FactorProfile { levels })
}

fn validate_parameters(c: usize, levels: &[usize], t: u64, d: u64, delta: u64, mode: PropertyMode) -> Result<()> {
    if t == 0 {
        return Err(Error::ParameterInfeasible { rule: "t must be at least 1".to_string() });
    }
    if t as usize > c {
        return Err(Error::ParameterInfeasible { rule: format!("t ({t}) cannot exceed the column count ({c})") });
    }
    if mode.wants_location() || mode.wants_detection() {
        if d == 0 {
            return Err(Error::ParameterInfeasible { rule: "d must be at least 1".to_string() });
        }
        let d = d as usize;
        if levels.iter().any(|&l| l < d) {
            return Err(Error::ParameterInfeasible {
                rule: format!("every factor level must be at least d ({d}) for a locating/detecting array"),
            });
        }
        let at_d = levels.iter().filter(|&&l| l == d).count();
        if at_d >= 2 {
            return Err(Error::ParameterInfeasible {
                rule: format!("at most one factor may sit exactly at level d ({d}); found {at_d}"),
            });
        }
    }
    if mode.wants_detection() {
        if delta == 0 {
            return Err(Error::ParameterInfeasible { rule: "delta must be at least 1".to_string() });
        }
        let d = d as usize;
        if levels.iter().any(|&l| l <= d) {
            return Err(Error::ParameterInfeasible {
                rule: format!("every factor level must exceed d ({d}) for a detecting array"),
            });
        }
    }
    Ok(())
}

/// Reads a pre-existing row prefix: one row per line, `C` whitespace
/// separated non-negative integers, each within its factor's level bound.
pub fn read_partial_file(path: &str, levels: &[usize]) -> Result<Vec<Row>> {
    let text = fs::read_to_string(Path::new(path))?;
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != levels.len() {
            return Err(Error::InputSyntax {
                file: path.to_string(),
                line: idx + 1,
                expected: format!("{} values", levels.len()),
                actual: format!("{} tokens", tokens.len()),
            });
        }
        let mut row = Vec::with_capacity(levels.len());
        for (col, tok) in tokens.iter().enumerate() {
            let value: i64 = tok.parse().map_err(|_| Error::InputSyntax {
                file: path.to_string(),
                line: idx + 1,
                expected: "a non-negative integer".to_string(),
                actual: tok.to_string(),
            })?;
            if value < 0 || value as usize >= levels[col] {
                return Err(Error::InputSemantics {
                    file: path.to_string(),
                    row: idx + 1,
                    col,
                    value,
                    level: levels[col],
                });
            }
            row.push(value as usize);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_t_zero() {
        let err = validate_parameters(3, &[2, 2, 2], 0, 0, 0, PropertyMode::CoverageOnly).unwrap_err();
        assert!(matches!(err, Error::ParameterInfeasible { .. }));
    }

    #[test]
    fn rejects_t_larger_than_columns() {
        let err = validate_parameters(2, &[2, 2], 5, 0, 0, PropertyMode::CoverageOnly).unwrap_err();
        assert!(matches!(err, Error::ParameterInfeasible { .. }));
    }

    #[test]
    fn rejects_two_factors_at_level_d() {
        let err = validate_parameters(4, &[2, 2, 3, 3], 2, 2, 0, PropertyMode::CoverageAndLocation).unwrap_err();
        assert!(matches!(err, Error::ParameterInfeasible { .. }));
    }

    #[test]
    fn accepts_well_formed_locating_parameters() {
        assert!(validate_parameters(4, &[3, 3, 3, 3], 2, 2, 0, PropertyMode::CoverageAndLocation).is_ok());
    }

    #[test]
    fn partial_file_rejects_out_of_range_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.txt");
        std::fs::write(&path, "0 5\n").unwrap();
        let err = read_partial_file(path.to_str().unwrap(), &[2, 2]).unwrap_err();
        assert!(matches!(err, Error::InputSemantics { .. }));
    }

    #[test]
    fn partial_file_rejects_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.txt");
        std::fs::write(&path, "0\n").unwrap();
        let err = read_partial_file(path.to_str().unwrap(), &[2, 2]).unwrap_err();
        assert!(matches!(err, Error::InputSyntax { .. }));
    }
}
