//! Tabular export of recorded events

use crate::physics::math::Scalar;
use std::io::{self, Write};

/// A header plus rows of optional numbers; `None` is written as an empty cell
///
/// Header names are separated by `", "`, data cells by a bare comma.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<Scalar>>>,
}

impl CsvTable {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: impl IntoIterator<Item = Option<Scalar>>) {
        self.rows.push(row.into_iter().collect());
    }

    /// Append a row with every cell present.
    pub fn push_values(&mut self, row: impl IntoIterator<Item = Scalar>) {
        self.push_row(row.into_iter().map(Some));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.header.join(", "))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.map(|value| value.to_string()).unwrap_or_default())
                .collect();
            writeln!(writer, "{}", cells.join(","))?;
        }
        writer.flush()
    }

    /// Write the table to `path`, replacing any existing file.
    pub fn save(&self, path: &str) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells() {
        let mut table = CsvTable::new(["i/rad", "c/rad", "r/rad", "n1", "n2"]);
        table.push_row([Some(0.5), None, Some(0.25), Some(1.0), Some(1.5)]);

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "i/rad, c/rad, r/rad, n1, n2\n0.5,,0.25,1,1.5\n"
        );
    }

    #[test]
    fn test_header_only() {
        let table = CsvTable::new(["t", "n", "model"]);
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();

        assert!(table.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "t, n, model\n");
    }
}
