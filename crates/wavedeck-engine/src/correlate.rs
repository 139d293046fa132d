// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;
use wavedeck_model::{Record, Table, columns};

/// Rendering for a correlation miss. Never a null propagated into
/// downstream aggregation.
pub const NOT_FOUND_PLACEHOLDER: &str = "N/A";

/// Contact identity of one security-group user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub user_name: String,
    pub display_name: String,
    pub email: String,
    pub group: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a ContactCard),
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn display_name(&self) -> &'a str {
        match self {
            Self::Found(card) => &card.display_name,
            Self::NotFound => NOT_FOUND_PLACEHOLDER,
        }
    }

    pub fn email(&self) -> &'a str {
        match self {
            Self::Found(card) => &card.email,
            Self::NotFound => NOT_FOUND_PLACEHOLDER,
        }
    }

    pub fn group(&self) -> &'a str {
        match self {
            Self::Found(card) => &card.group,
            Self::NotFound => NOT_FOUND_PLACEHOLDER,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A single user joined against the security set, placeholders
/// already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub soe_id: String,
    pub display_name: String,
    pub email: String,
    pub group: String,
}

/// Security users pre-indexed by lower-cased username so resolving a
/// whole single-users view stays linear in table size.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    index: HashMap<String, ContactCard>,
}

impl Directory {
    pub fn index(security: &Table) -> Self {
        let mut index = HashMap::with_capacity(security.len());
        for record in security.records() {
            let user_name = record.text(columns::USER_NAME);
            if user_name.is_empty() {
                continue;
            }
            let key = user_name.to_lowercase();
            // First row wins on duplicate usernames, matching the
            // keep-first dedup rule elsewhere.
            index.entry(key).or_insert_with(|| ContactCard {
                user_name,
                display_name: record.text(columns::DISPLAY_NAME),
                email: record.text(columns::EMAIL_ADDRESS),
                group: record.text(columns::GROUP_NAME),
            });
        }
        Self { index }
    }

    pub fn resolve(&self, identity: &str) -> Resolution<'_> {
        match self.index.get(&identity.to_lowercase()) {
            Some(card) => Resolution::Found(card),
            None => Resolution::NotFound,
        }
    }

    /// Joins each single-user record to its security record by SOE
    /// id. Misses surface as placeholder cells, never as errors.
    pub fn member_rows(&self, users: &[&Record]) -> Vec<MemberRow> {
        users
            .iter()
            .map(|user| {
                let soe_id = user.text(columns::USER_SOE_ID);
                let resolution = self.resolve(&soe_id);
                MemberRow {
                    soe_id,
                    display_name: resolution.display_name().to_owned(),
                    email: resolution.email().to_owned(),
                    group: resolution.group().to_owned(),
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Directory, NOT_FOUND_PLACEHOLDER, Resolution};
    use wavedeck_model::{Record, Table, TableKind, Value, columns};

    fn security_table() -> Table {
        let mut table = Table::new("security_group_users", TableKind::SecurityUsers.schema());
        let mut record = Record::new();
        record.push(columns::USER_NAME, Value::Text("ABC".to_owned()));
        record.push(columns::DISPLAY_NAME, Value::Text("A. B. C.".to_owned()));
        record.push(columns::EMAIL_ADDRESS, Value::Text("abc@example.com".to_owned()));
        record.push(columns::GROUP_NAME, Value::Text("wave-admins".to_owned()));
        table.push(record);
        table
    }

    #[test]
    fn resolve_matches_usernames_case_insensitively() {
        let directory = Directory::index(&security_table());

        let resolution = directory.resolve("abc");
        assert!(resolution.is_found());
        assert_eq!(resolution.display_name(), "A. B. C.");
        assert_eq!(resolution.group(), "wave-admins");
    }

    #[test]
    fn missing_identity_yields_the_sentinel_not_an_error() {
        let directory = Directory::index(&security_table());

        let resolution = directory.resolve("nobody");
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(resolution.display_name(), NOT_FOUND_PLACEHOLDER);
        assert_eq!(resolution.email(), NOT_FOUND_PLACEHOLDER);
    }

    #[test]
    fn member_rows_apply_placeholders_per_user() {
        let directory = Directory::index(&security_table());

        let mut known = Record::new();
        known.push(columns::USER_SOE_ID, Value::Text("abc".to_owned()));
        let mut unknown = Record::new();
        unknown.push(columns::USER_SOE_ID, Value::Text("zzz".to_owned()));

        let rows = directory.member_rows(&[&known, &unknown]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "A. B. C.");
        assert_eq!(rows[1].display_name, NOT_FOUND_PLACEHOLDER);
        assert_eq!(rows[1].soe_id, "zzz");
    }

    #[test]
    fn duplicate_usernames_keep_the_first_indexed_row() {
        let mut table = security_table();
        let mut duplicate = Record::new();
        duplicate.push(columns::USER_NAME, Value::Text("abc".to_owned()));
        duplicate.push(columns::DISPLAY_NAME, Value::Text("Impostor".to_owned()));
        table.push(duplicate);

        let directory = Directory::index(&table);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.resolve("ABC").display_name(), "A. B. C.");
    }
}
