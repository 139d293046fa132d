// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::record::{ColumnKind, Schema};
use serde::{Deserialize, Serialize};

// Projects sheet columns.
pub const TEMPLATE_KEY: &str = "Template Key";
pub const PROJECT_KEY: &str = "Active Project Key";
pub const PROJECT_NAME: &str = "Active Project Name";
pub const LAST_ISSUE_UPDATED: &str = "Last Issue Updated";
pub const REGION: &str = "Region";

// Single-users sheet columns.
pub const USER_SOE_ID: &str = "User SOE ID";
pub const USER_TEMPLATE_KEY: &str = "TEMPLATE_KEY";

// Security-group sheet columns.
pub const USER_NAME: &str = "USER_NAME";
pub const DISPLAY_NAME: &str = "DISPLAY_NAME";
pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const GROUP_NAME: &str = "GROUP_NAME";

// Flattened issue rows from the tracker store.
pub const ISSUE_PROJECT_KEY: &str = "Project Key";
pub const ISSUE_NUMBER: &str = "Issue Number";

/// Virtual field: project key and issue number concatenated with a
/// dash. Evaluated after concatenation, never as two independent
/// constraints.
pub const ISSUE_KEY: &str = "Issue Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Nam,
    Apac,
}

impl Region {
    pub const ALL: [Self; 2] = [Self::Nam, Self::Apac];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nam => "NAM",
            Self::Apac => "APAC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NAM" => Some(Self::Nam),
            "APAC" => Some(Self::Apac),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Projects,
    SingleUsers,
    SecurityUsers,
}

impl TableKind {
    pub const ALL: [Self; 3] = [Self::Projects, Self::SingleUsers, Self::SecurityUsers];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::SingleUsers => "single_users",
            Self::SecurityUsers => "security_group_users",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "projects" => Some(Self::Projects),
            "single_users" => Some(Self::SingleUsers),
            "security_group_users" => Some(Self::SecurityUsers),
            _ => None,
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            Self::Projects => Schema::new(&[
                (TEMPLATE_KEY, ColumnKind::Text),
                (PROJECT_KEY, ColumnKind::Text),
                (PROJECT_NAME, ColumnKind::Text),
                (LAST_ISSUE_UPDATED, ColumnKind::Date),
                (REGION, ColumnKind::Text),
            ]),
            Self::SingleUsers => Schema::new(&[
                (USER_SOE_ID, ColumnKind::Text),
                (USER_TEMPLATE_KEY, ColumnKind::Text),
                (REGION, ColumnKind::Text),
            ]),
            Self::SecurityUsers => Schema::new(&[
                (USER_NAME, ColumnKind::Text),
                (DISPLAY_NAME, ColumnKind::Text),
                (EMAIL_ADDRESS, ColumnKind::Text),
                (GROUP_NAME, ColumnKind::Text),
                (REGION, ColumnKind::Text),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, TableKind};

    #[test]
    fn region_round_trips_through_labels() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
        assert_eq!(Region::parse("EMEA"), None);
    }

    #[test]
    fn table_schemas_carry_fixed_columns() {
        assert_eq!(TableKind::Projects.schema().len(), 5);
        assert_eq!(TableKind::SingleUsers.schema().len(), 3);
        assert_eq!(TableKind::SecurityUsers.schema().len(), 5);
    }

    #[test]
    fn table_kind_parses_its_own_labels() {
        for kind in TableKind::ALL {
            assert_eq!(TableKind::parse(kind.as_str()), Some(kind));
        }
    }
}
