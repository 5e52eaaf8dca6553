use std::collections::HashMap;

/// Tabular thermodynamic output, one named column per thermo quantity.
///
/// Invariant: every column holds the same number of rows. The table is
/// assembled by the thermo-log parser through `new`/`push_row` and offers no
/// public mutation afterward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermoTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Vec<f64>>,
}

impl ThermoTable {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        let columns = vec![Vec::new(); names.len()];
        Self {
            names,
            index,
            columns,
        }
    }

    /// Appends one accepted data row. `values` must match the header width.
    pub(crate) fn push_row(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.columns.len());
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(*value);
        }
    }

    /// Number of tokens in the header line, zero before any header was seen.
    pub fn width(&self) -> usize {
        self.names.len()
    }

    /// Number of accepted data rows.
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// True when no header was found or no row survived parsing.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows() -> ThermoTable {
        let mut table = ThermoTable::new(vec!["Step".into(), "Temp".into()]);
        table.push_row(&[0.0, 1.5]);
        table.push_row(&[100.0, 1.7]);
        table
    }

    #[test]
    fn columns_share_length() {
        let table = table_with_rows();
        assert_eq!(table.rows(), 2);
        for name in ["Step", "Temp"] {
            assert_eq!(table.column(name).unwrap().len(), 2);
        }
    }

    #[test]
    fn unknown_column_is_none() {
        let table = table_with_rows();
        assert!(table.column("Press").is_none());
        assert!(!table.has_column("Press"));
    }

    #[test]
    fn default_table_is_empty() {
        let table = ThermoTable::default();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
    }
}
