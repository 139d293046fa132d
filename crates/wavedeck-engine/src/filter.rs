// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use wavedeck_model::{Constraint, FilterSpec, MatchMode, Record, Table, columns};

/// String form of a field for predicate evaluation. The derived
/// issue-key identity is concatenated here before comparison; every
/// other field reads straight from the record, with null/missing
/// fields as the empty string.
pub fn field_string(record: &Record, field: &str) -> String {
    if field == columns::ISSUE_KEY {
        let project_key = record.text(columns::ISSUE_PROJECT_KEY);
        let issue_number = record.text(columns::ISSUE_NUMBER);
        if project_key.is_empty() && issue_number.is_empty() {
            return String::new();
        }
        return format!("{project_key}-{issue_number}");
    }
    record.text(field)
}

fn constraint_matches(record: &Record, constraint: &Constraint) -> bool {
    if constraint.value.is_empty() {
        return true;
    }

    let field = field_string(record, &constraint.field).to_lowercase();
    let wanted = constraint.value.to_lowercase();
    match constraint.mode {
        MatchMode::Substring => field.contains(&wanted),
        MatchMode::Exact => field == wanted,
    }
}

/// True iff the record satisfies every non-empty constraint (AND).
pub fn matches(record: &Record, spec: &FilterSpec) -> bool {
    spec.constraints()
        .iter()
        .all(|constraint| constraint_matches(record, constraint))
}

/// Filters a record sequence, preserving order. An unconstrained
/// spec returns the input unchanged.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| matches(record, spec))
        .collect()
}

pub fn filter_table<'a>(table: &'a Table, spec: &FilterSpec) -> Vec<&'a Record> {
    filter(table.records(), spec)
}

#[cfg(test)]
mod tests {
    use super::{field_string, filter_table, matches};
    use wavedeck_model::{FilterSpec, Record, Table, TableKind, Value, columns};

    fn security_user(name: &str, display: &str, email: &str, group: &str) -> Record {
        let mut record = Record::new();
        record.push(columns::USER_NAME, Value::Text(name.to_owned()));
        record.push(columns::DISPLAY_NAME, Value::Text(display.to_owned()));
        record.push(columns::EMAIL_ADDRESS, Value::Text(email.to_owned()));
        record.push(columns::GROUP_NAME, Value::Text(group.to_owned()));
        record.push(columns::REGION, Value::Text("NAM".to_owned()));
        record
    }

    fn security_table() -> Table {
        let mut table = Table::new("security_group_users", TableKind::SecurityUsers.schema());
        table.push(security_user("abc12", "Alice Cooper", "alice@example.com", "wave-admins"));
        table.push(security_user("xyz34", "Bob Alton", "bob@example.com", "wave-readers"));
        table.push(security_user("qrs56", "Carol Diaz", "carol@example.com", "ops"));
        table
    }

    #[test]
    fn unconstrained_spec_returns_table_in_order() {
        let table = security_table();
        let spec = FilterSpec::new().substring(columns::USER_NAME, "");

        let view = filter_table(&table, &spec);
        assert_eq!(view.len(), 3);
        assert_eq!(view[0].text(columns::USER_NAME), "abc12");
        assert_eq!(view[2].text(columns::USER_NAME), "qrs56");
    }

    #[test]
    fn substring_constraints_are_case_insensitive() {
        let table = security_table();
        let spec = FilterSpec::new().substring(columns::DISPLAY_NAME, "AL");

        let view = filter_table(&table, &spec);
        // "Alice" and "Alton" both contain "al".
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn exact_constraints_do_not_leak_substring_matches() {
        let table = security_table();
        let spec = FilterSpec::new().exact(columns::GROUP_NAME, "wave-admins");

        let view = filter_table(&table, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].text(columns::USER_NAME), "abc12");

        let partial = FilterSpec::new().exact(columns::GROUP_NAME, "wave");
        assert!(filter_table(&table, &partial).is_empty());
    }

    #[test]
    fn constraints_combine_with_and() {
        let table = security_table();
        let spec = FilterSpec::new()
            .substring(columns::DISPLAY_NAME, "al")
            .substring(columns::GROUP_NAME, "readers");

        let view = filter_table(&table, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].text(columns::USER_NAME), "xyz34");
    }

    #[test]
    fn non_empty_constraint_against_missing_field_is_false() {
        let mut record = Record::new();
        record.push(columns::USER_NAME, Value::Text("abc12".to_owned()));
        record.push(columns::EMAIL_ADDRESS, Value::Null);

        let on_null = FilterSpec::new().substring(columns::EMAIL_ADDRESS, "ex");
        assert!(!matches(&record, &on_null));

        let on_absent = FilterSpec::new().substring(columns::GROUP_NAME, "ops");
        assert!(!matches(&record, &on_absent));

        let empty = FilterSpec::new().substring(columns::GROUP_NAME, "");
        assert!(matches(&record, &empty));
    }

    #[test]
    fn issue_key_is_evaluated_after_concatenation() {
        let mut record = Record::new();
        record.push(columns::ISSUE_PROJECT_KEY, Value::Text("CRM".to_owned()));
        record.push(columns::ISSUE_NUMBER, Value::Number(101.0));

        assert_eq!(field_string(&record, columns::ISSUE_KEY), "CRM-101");

        let spec = FilterSpec::new().exact(columns::ISSUE_KEY, "crm-101");
        assert!(matches(&record, &spec));

        // Half of the identity alone must not match.
        let partial = FilterSpec::new().exact(columns::ISSUE_KEY, "CRM");
        assert!(!matches(&record, &partial));
    }
}
