use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

/// A table row as returned by the store: column (or embed) name to JSON value.
pub type Row = Map<String, Value>;

/// Extracts a fixed set of fields from a request body.
///
/// Fields missing from `body` are left out (the store applies its defaults),
/// fields explicitly set to `null` are kept. Anything else in `body` is ignored.
pub fn pick(body: &Row, fields: &[&str]) -> Row {
    fields
        .iter()
        .filter_map(|f| body.get(*f).map(|v| ((*f).to_owned(), v.clone())))
        .collect()
}

/// List response, serialized as `{ "total": <n>, "<key>": [rows] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    key: &'static str,
    rows: Vec<Row>,
}

impl Listing {
    pub fn new(key: &'static str, rows: Vec<Row>) -> Self {
        Self { key, rows }
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("total", &self.total())?;
        map.serialize_entry(self.key, &self.rows)?;
        map.end()
    }
}
