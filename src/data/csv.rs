//! CSV loading for binary-labelled numeric datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled
//! - Last column is the label and must be 0 or 1; every other column is a feature

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Features `(rows × n_features)` and labels `(rows × 1)`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub inputs: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.rows == 0
    }

    pub fn n_features(&self) -> usize {
        self.inputs.cols
    }
}

pub fn load_csv(path: &str) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text)
}

pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut lines = text.lines().peekable();

    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<f64> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() < 2 {
            return Err(NetError::Data(format!(
                "Row {}: expected at least 2 columns (features + label), got {}",
                row_idx + 1,
                cells.len()
            )));
        }

        let (feature_cells, label_cell) = cells.split_at(cells.len() - 1);
        let feats = parse_floats(feature_cells, row_idx + 1)?;
        let label = parse_floats(label_cell, row_idx + 1)?[0];
        if label != 0.0 && label != 1.0 {
            return Err(NetError::Data(format!(
                "Row {}: label {} is not 0 or 1",
                row_idx + 1,
                label
            )));
        }

        inputs.push(feats);
        labels.push(label);
    }

    if inputs.is_empty() {
        return Err(NetError::Data("CSV contains no data rows after parsing".into()));
    }

    Ok(Dataset {
        inputs: Matrix::from_rows(inputs)?,
        labels: Matrix::column(&labels),
    })
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells
        .iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                NetError::Data(format!("Row {}: '{}' is not a valid number", row_num, c))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_header_and_quotes() {
        let text = "radius,\"texture, mean\",label\n1.5,\"2.0\",1\n\n-0.5,3.25,0\n";
        let ds = parse_csv(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.inputs.data, vec![vec![1.5, 2.0], vec![-0.5, 3.25]]);
        assert_eq!(ds.labels.data, vec![vec![1.0], vec![0.0]]);
    }

    #[test]
    fn rejects_non_binary_labels() {
        let err = parse_csv("1.0,2.0,3\n").unwrap_err();
        assert!(err.to_string().contains("not 0 or 1"));
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(matches!(parse_csv("1,2,1\n1,0\n"), Err(NetError::Data(_))));
    }

    #[test]
    fn rejects_header_only() {
        assert!(matches!(parse_csv("a,b,label\n"), Err(NetError::Data(_))));
    }
}
