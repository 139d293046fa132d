// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic sample-data generation for tests and demo seeding.
//! Same seed, same records, on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;
use time::{Date, Month};
use wavedeck_model::{Record, Region, Table, TableKind, Value, columns, serial};

pub const TEMPLATE_KEYS: [&str; 8] = [
    "WAVE-CRM",
    "WAVE-HR",
    "WAVE-FIN",
    "WAVE-OPS",
    "WAVE-SEC",
    "WAVE-DATA",
    "WAVE-INFRA",
    "WAVE-SUPPORT",
];

const PROJECT_NOUNS: [&str; 10] = [
    "Billing",
    "Onboarding",
    "Payments",
    "Reporting",
    "Inventory",
    "Compliance",
    "Migration",
    "Analytics",
    "Provisioning",
    "Archival",
];
const PROJECT_QUALIFIERS: [&str; 6] = [
    "Platform",
    "Pipeline",
    "Portal",
    "Gateway",
    "Console",
    "Service",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const GROUP_NAMES: [&str; 6] = [
    "wave-admins",
    "wave-release",
    "wave-support",
    "wave-readonly",
    "wave-audit",
    "wave-ops",
];

pub const ISSUE_STATUSES: [&str; 4] = ["Open", "In Progress", "Resolved", "Closed"];
pub const ISSUE_TYPES: [&str; 4] = ["Bug", "Task", "Story", "Incident"];
pub const ISSUE_PRIORITIES: [&str; 4] = ["Critical", "High", "Medium", "Low"];

// Day serials spanning 2021-01-01 .. 2026-01-01.
const SERIAL_FLOOR: i64 = 44_197;
const SERIAL_CEILING: i64 = 46_023;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// One issue ready to be inserted into a tracker store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSeed {
    pub project_key: String,
    pub issue_num: i64,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub reporter: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct DashFaker {
    rng: DeterministicRng,
}

impl DashFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn template_key(&mut self) -> &'static str {
        self.pick(&TEMPLATE_KEYS)
    }

    pub fn region(&mut self) -> Region {
        Region::ALL[self.rng.int_n(Region::ALL.len())]
    }

    /// Lowercase corporate login, e.g. `awalker3`.
    pub fn soe_id(&mut self) -> String {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        format!(
            "{}{}{}",
            first
                .chars()
                .next()
                .map(|ch| ch.to_ascii_lowercase())
                .unwrap_or('x'),
            last.to_ascii_lowercase(),
            self.rng.int_n(10),
        )
    }

    pub fn display_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn project_key(&mut self) -> String {
        format!(
            "{}{}",
            self.pick(&PROJECT_NOUNS)
                .chars()
                .take(3)
                .collect::<String>()
                .to_uppercase(),
            100 + self.rng.int_n(900),
        )
    }

    pub fn project_name(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&PROJECT_NOUNS),
            self.pick(&PROJECT_QUALIFIERS)
        )
    }

    pub fn update_date(&mut self) -> Date {
        let span = (SERIAL_CEILING - SERIAL_FLOOR) as usize;
        let serial_day = SERIAL_FLOOR + self.rng.int_n(span) as i64;
        serial::serial_to_date(serial_day).unwrap_or(reference_date())
    }

    pub fn project_record(&mut self, region: Region) -> Record {
        let mut record = Record::new();
        record.push(
            columns::TEMPLATE_KEY,
            Value::Text(self.template_key().to_owned()),
        );
        record.push(columns::PROJECT_KEY, Value::Text(self.project_key()));
        record.push(columns::PROJECT_NAME, Value::Text(self.project_name()));
        record.push(columns::LAST_ISSUE_UPDATED, Value::Date(self.update_date()));
        record.push(columns::REGION, Value::Text(region.as_str().to_owned()));
        record
    }

    pub fn single_user_record(&mut self, soe_id: &str, region: Region) -> Record {
        let mut record = Record::new();
        record.push(columns::USER_SOE_ID, Value::Text(soe_id.to_owned()));
        record.push(
            columns::USER_TEMPLATE_KEY,
            Value::Text(self.template_key().to_owned()),
        );
        record.push(columns::REGION, Value::Text(region.as_str().to_owned()));
        record
    }

    pub fn security_user_record(&mut self, user_name: &str, region: Region) -> Record {
        let display = self.display_name();
        let email = format!(
            "{}@example.com",
            display.to_ascii_lowercase().replace(' ', ".")
        );
        let mut record = Record::new();
        record.push(columns::USER_NAME, Value::Text(user_name.to_owned()));
        record.push(columns::DISPLAY_NAME, Value::Text(display));
        record.push(columns::EMAIL_ADDRESS, Value::Text(email));
        record.push(
            columns::GROUP_NAME,
            Value::Text(self.pick(&GROUP_NAMES).to_owned()),
        );
        record.push(columns::REGION, Value::Text(region.as_str().to_owned()));
        record
    }

    pub fn issue_seed(&mut self, project_key: &str, issue_num: i64) -> IssueSeed {
        let created = self.update_date();
        let mut updated = self.update_date();
        if updated < created {
            updated = created;
        }
        IssueSeed {
            project_key: project_key.to_owned(),
            issue_num,
            summary: self.sentence(4, 9),
            description: self.sentence(8, 18),
            issue_type: self.pick(&ISSUE_TYPES).to_owned(),
            status: self.pick(&ISSUE_STATUSES).to_owned(),
            priority: self.pick(&ISSUE_PRIORITIES).to_owned(),
            assignee: self.soe_id(),
            reporter: self.soe_id(),
            created_at: format_date(created),
            updated_at: format_date(updated),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        const WORDS: [&str; 24] = [
            "login", "timeout", "retry", "export", "report", "dashboard", "filter", "update",
            "deploy", "rollback", "schema", "index", "queue", "worker", "cache", "audit", "alert",
            "token", "session", "upload", "sync", "config", "migrate", "validate",
        ];

        let span = max_words.saturating_sub(min_words) + 1;
        let count = min_words + self.rng.int_n(span);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// A projects sheet with `count` rows spread across both regions and
/// a handful of duplicate project keys so dedup has work to do.
pub fn sample_projects(seed: u64, count: usize) -> Table {
    let mut faker = DashFaker::new(seed);
    let mut table = Table::new(TableKind::Projects.as_str(), TableKind::Projects.schema());
    let mut keys: Vec<String> = Vec::new();
    for index in 0..count {
        let region = if index % 3 == 0 { Region::Apac } else { Region::Nam };
        let mut record = faker.project_record(region);
        // Every fifth row reuses an earlier key.
        if index % 5 == 4
            && let Some(existing) = keys.get(faker.int_n(keys.len().max(1)))
        {
            record = replace_text(record, columns::PROJECT_KEY, existing);
        } else if let Some(Value::Text(key)) = record.get(columns::PROJECT_KEY) {
            keys.push(key.clone());
        }
        table.push(record);
    }
    table
}

/// A single-users sheet whose SOE ids overlap `security` usernames on
/// roughly two rows out of three; the remainder exercise the
/// not-found path.
pub fn sample_single_users(seed: u64, count: usize, security: &Table) -> Table {
    let mut faker = DashFaker::new(seed);
    let known: Vec<String> = security
        .records()
        .iter()
        .map(|record| record.text(columns::USER_NAME))
        .filter(|name| !name.is_empty())
        .collect();

    let mut table = Table::new(
        TableKind::SingleUsers.as_str(),
        TableKind::SingleUsers.schema(),
    );
    for index in 0..count {
        let region = if index % 3 == 0 { Region::Apac } else { Region::Nam };
        let soe_id = if index % 3 != 2 && !known.is_empty() {
            known[faker.int_n(known.len())].clone()
        } else {
            faker.soe_id()
        };
        table.push(faker.single_user_record(&soe_id, region));
    }
    table
}

pub fn sample_security_users(seed: u64, count: usize) -> Table {
    let mut faker = DashFaker::new(seed);
    let mut table = Table::new(
        TableKind::SecurityUsers.as_str(),
        TableKind::SecurityUsers.schema(),
    );
    for index in 0..count {
        let region = if index % 3 == 0 { Region::Apac } else { Region::Nam };
        let user_name = faker.soe_id();
        table.push(faker.security_user_record(&user_name, region));
    }
    table
}

/// Issues for every project key in `projects`, a few per key.
pub fn sample_issues(seed: u64, projects: &Table) -> Vec<IssueSeed> {
    let mut faker = DashFaker::new(seed);
    let mut issues = Vec::new();
    for record in projects.records() {
        let project_key = record.text(columns::PROJECT_KEY);
        if project_key.is_empty() {
            continue;
        }
        let per_project = 1 + faker.int_n(4);
        for offset in 0..per_project {
            issues.push(faker.issue_seed(&project_key, (offset + 1) as i64));
        }
    }
    issues
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("wavedeck.db");
    Ok((dir, db_path))
}

pub fn temp_sheets_dir() -> Result<tempfile::TempDir> {
    tempfile::tempdir().context("create temp sheets dir")
}

fn reference_date() -> Date {
    Date::from_calendar_date(2026, Month::January, 1).expect("valid calendar date")
}

fn format_date(date: Date) -> String {
    wavedeck_model::format_iso_date(date)
}

fn replace_text(record: Record, field: &str, value: &str) -> Record {
    let mut replaced = Record::with_capacity(record.len());
    for (name, existing) in record.fields().cloned() {
        if name == field {
            replaced.push(name, Value::Text(value.to_owned()));
        } else {
            replaced.push(name, existing);
        }
    }
    replaced
}
