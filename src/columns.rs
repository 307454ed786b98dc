////////////////////////////////////////////////////////////////////
// columns module
////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

use crate::typed_values::TypedValue;

/// Represents a named column of cell values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<TypedValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<TypedValue>) -> Column {
        Column { name: name.into(), values }
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn get_values(&self) -> &Vec<TypedValue> {
        &self.values
    }

    pub fn get_value(&self, row_id: usize) -> &TypedValue {
        &self.values[row_id]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: TypedValue) {
        self.values.push(value)
    }

    /// Returns up to `limit` distinct non-null values in row order
    pub fn sample_values(&self, limit: usize) -> Vec<&TypedValue> {
        let mut samples: Vec<&TypedValue> = Vec::new();
        for value in &self.values {
            if samples.len() >= limit { break; }
            if value.is_null() { continue; }
            if samples.iter().any(|s| s.matches(value)) { continue; }
            samples.push(value);
        }
        samples
    }

    /// Returns a copy of the column containing only the rows at `row_ids`
    pub fn take_rows(&self, row_ids: &[usize]) -> Column {
        let values = row_ids.iter()
            .map(|id| self.values[*id].to_owned())
            .collect();
        Column::new(self.name.as_str(), values)
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::columns::Column;
    use crate::typed_values::TypedValue::{Null, Number, StringValue};

    #[test]
    fn test_sample_values_skips_nulls_and_duplicates() {
        let column = Column::new("exchange", vec![
            StringValue("NYSE".into()),
            Null,
            StringValue("AMEX".into()),
            StringValue("NYSE".into()),
            StringValue("NASDAQ".into()),
        ]);
        let samples = column.sample_values(5);
        assert_eq!(samples, vec![
            &StringValue("NYSE".into()),
            &StringValue("AMEX".into()),
            &StringValue("NASDAQ".into()),
        ]);
    }

    #[test]
    fn test_sample_values_honors_limit() {
        let column = Column::new("rank", (0..10).map(|n| Number(n as f64)).collect());
        assert_eq!(column.sample_values(5).len(), 5);
    }

    #[test]
    fn test_take_rows() {
        let column = Column::new("rank", vec![Number(1.), Number(2.), Number(3.)]);
        assert_eq!(column.take_rows(&[2, 0]),
                   Column::new("rank", vec![Number(3.), Number(1.)]));
    }
}
