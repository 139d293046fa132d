// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;

/// A single cell. Sheet loads produce `Null` for missing or
/// unparseable cells rather than failing the row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Date(Date),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String form used for filtering and rendering. `Null` is the
    /// empty string, so a non-empty constraint against a missing
    /// field never matches.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => format_number(*number),
            Self::Date(date) => format_iso_date(*date),
        }
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}

pub fn format_iso_date(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_owned())
}

pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw, &format_description!("[year]-[month]-[day]")).ok()
}

/// An ordered field-name to value mapping. Field order is the load
/// order of the table's columns and is preserved through filtering,
/// grouping, and export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// String form of a field; missing fields read as empty.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(Value::display_string).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &(String, Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Fixed column layout of one table. Field name sets differ per
/// table but never vary between rows of the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: &[(&str, ColumnKind)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, kind)| Column {
                    name: (*name).to_owned(),
                    kind: *kind,
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.kind)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One loaded record set. Populated once per load and treated as an
/// immutable snapshot for the duration of a filter/page cycle; a
/// reload produces a fresh `Table`, never in-place mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnKind, Record, Schema, Value};
    use time::{Date, Month};

    #[test]
    fn null_and_missing_fields_read_as_empty_text() {
        let mut record = Record::new();
        record.push("name", Value::Text("alpha".to_owned()));
        record.push("note", Value::Null);

        assert_eq!(record.text("name"), "alpha");
        assert_eq!(record.text("note"), "");
        assert_eq!(record.text("absent"), "");
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(Value::Number(44197.0).display_string(), "44197");
        assert_eq!(Value::Number(2.5).display_string(), "2.5");
    }

    #[test]
    fn dates_render_as_iso() {
        let date = Date::from_calendar_date(2021, Month::January, 1).expect("valid date");
        assert_eq!(Value::Date(date).display_string(), "2021-01-01");
    }

    #[test]
    fn schema_lookup_by_name() {
        let schema = Schema::new(&[("id", ColumnKind::Number), ("name", ColumnKind::Text)]);
        assert_eq!(schema.kind_of("id"), Some(ColumnKind::Number));
        assert_eq!(schema.kind_of("missing"), None);
        assert_eq!(schema.column_names(), vec!["id", "name"]);
    }
}
