// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::collections::HashMap;
use time::Date;
use wavedeck_model::{Record, Table, Value, parse_iso_date, serial};

/// Records sharing one partition key, in their filtered-view order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: String,
    pub records: Vec<&'a Record>,
}

impl Group<'_> {
    /// Group cardinality after dedup.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Latest normalized timestamp across members, skipping members
    /// whose field is null or unparseable. `None` when nothing in the
    /// group carries a usable timestamp.
    pub fn latest_update(&self, field: &str) -> Option<Date> {
        latest_update(&self.records, field)
    }
}

/// Keep-first dedup by primary id: among records sharing an id,
/// exactly the first in natural row order survives. Reproduces the
/// ROW_NUMBER-partition rn=1 rule and is idempotent.
pub fn dedup_by_id<'a>(records: &[&'a Record], id_field: &str) -> Vec<&'a Record> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut output = Vec::with_capacity(records.len());
    for record in records {
        let id = record.text(id_field);
        if seen.insert(id) {
            output.push(*record);
        }
    }
    output
}

/// Partitions records by `key_field`, preserving first-seen order of
/// keys and of records within each key.
pub fn group_by_key<'a>(records: &[&'a Record], key_field: &str) -> Vec<Group<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();
    for record in records {
        let key = record.text(key_field);
        match index.get(&key) {
            Some(&position) => groups[position].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }
    groups
}

/// Normalizes one timestamp cell to a calendar date. Day-serial
/// numbers and ISO strings both land on `time::Date` so the two
/// encodings are never compared raw against each other.
pub fn normalize_timestamp(value: &Value) -> Option<Date> {
    match value {
        Value::Null => None,
        Value::Date(date) => Some(*date),
        Value::Number(number) => {
            if !number.is_finite() {
                return None;
            }
            serial::serial_to_date(number.floor() as i64)
        }
        Value::Text(text) => {
            parse_iso_date(text).or_else(|| text.get(..10).and_then(parse_iso_date))
        }
    }
}

pub fn latest_update(records: &[&Record], field: &str) -> Option<Date> {
    records
        .iter()
        .filter_map(|record| record.get(field).and_then(normalize_timestamp))
        .max()
}

/// Sorted distinct partition keys of a table, for populating the
/// template filter choices.
pub fn template_keys(table: &Table, key_field: &str) -> Vec<String> {
    let mut keys: BTreeSet<String> = BTreeSet::new();
    for record in table.records() {
        let key = record.text(key_field);
        if !key.is_empty() {
            keys.insert(key);
        }
    }
    keys.into_iter().collect()
}
