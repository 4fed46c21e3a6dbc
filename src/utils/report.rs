// src/utils/report.rs

use crate::model::Structure;
use crate::tensor::TensorKind;
use std::collections::BTreeMap;

/// One cell of a fixed-width text table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// Single row of an ASCII table, every field right-aligned to `width`.
///
/// Finite non-integer numbers are printed with `precision` decimals, everything
/// else as is. Fields longer than `width` are not truncated.
pub fn table_row(values: &[Cell], width: usize, precision: usize) -> String {
    let mut out = String::new();
    for v in values {
        let s = match v {
            Cell::Number(x) if x.is_finite() && x.fract() != 0.0 => format!("{:.*}", precision, x),
            Cell::Number(x) => format!("{}", x),
            Cell::Text(t) => t.clone(),
        };
        out.push_str(&format!("{:>width$}", s, width = width));
    }
    out.push('\n');
    out
}

/// NMR overview of a structure: composition, then one row per atom with the
/// isotropic value of each tensor it carries ("-" when absent).
pub fn structure_summary(structure: &Structure, filename: &str, width: usize, precision: usize) -> String {
    let mut composition: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &structure.atoms {
        *composition.entry(atom.element.as_str()).or_default() += 1;
    }
    let formula: Vec<String> = composition
        .iter()
        .map(|(el, n)| format!("{}{}", el, n))
        .collect();

    let mut out = format!(
        "{}: {} atoms ({})\n",
        filename,
        structure.atoms.len(),
        formula.join(" ")
    );

    let kinds = [TensorKind::Ms, TensorKind::Efg];
    let mut header: Vec<Cell> = vec!["label".into(), "element".into()];
    header.extend(kinds.iter().map(|k| Cell::from(format!("{} iso", k))));
    out.push_str(&table_row(&header, width, precision));

    for atom in &structure.atoms {
        let mut row: Vec<Cell> = vec![atom.label.as_str().into(), atom.element.as_str().into()];
        row.extend(kinds.iter().map(|&k| match atom.tensor(k) {
            Some(t) => Cell::Number(t.isotropy()),
            None => Cell::from("-"),
        }));
        out.push_str(&table_row(&row, width, precision));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_alignment_and_precision() {
        let row = table_row(&["C1".into(), 0.5.into(), 2.0.into()], 8, 3);
        assert_eq!(row, "      C1   0.500       2\n");
    }

    #[test]
    fn summary_lists_isotropic_values() {
        let json = r#"{"atoms": [
            {"element": "C", "position": [0.0, 0.0, 0.0],
             "tensors": {"ms": [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 4.5]]}},
            {"element": "H", "position": [1.1, 0.0, 0.0]}
        ]}"#;
        let s = Structure::from_json_str(json, 0.2).unwrap();
        let txt = structure_summary(&s, "ch.json", 10, 2);
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines[0], "ch.json: 2 atoms (C1 H1)");
        assert_eq!(lines[1], "     label   element    ms iso   efg iso");
        assert_eq!(lines[2], "        C1         C      2.50         -");
        assert_eq!(lines[3], "        H1         H         -         -");
    }

    #[test]
    fn long_fields_are_kept() {
        let row = table_row(&["a_very_long_label".into()], 4, 2);
        assert_eq!(row, "a_very_long_label\n");
    }
}
