// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// How one constraint compares against a field's string form.
///
/// `Substring` serves the tabular views (username, display name,
/// email, group name); `Exact` serves identity lookups (status,
/// issue type, assignee, reporter, issue key). The two are distinct
/// and never conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Substring,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub field: String,
    pub value: String,
    pub mode: MatchMode,
}

/// A sparse set of per-field constraints combined with logical AND.
/// Empty-valued entries impose no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    constraints: Vec<Constraint>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces the constraint for `field`.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>, mode: MatchMode) {
        let field = field.into();
        let value = value.into();
        if let Some(existing) = self
            .constraints
            .iter_mut()
            .find(|constraint| constraint.field == field)
        {
            existing.value = value;
            existing.mode = mode;
        } else {
            self.constraints.push(Constraint { field, value, mode });
        }
    }

    pub fn substring(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value, MatchMode::Substring);
        self
    }

    pub fn exact(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value, MatchMode::Exact);
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// True when no entry imposes a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.constraints.iter().all(|constraint| constraint.value.is_empty())
    }
}
