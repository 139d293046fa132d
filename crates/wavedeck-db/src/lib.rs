// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! SQLite-backed tracker store. Issue search runs entirely in SQL:
//! exact-match filters bound as named parameters, duplicate rows from
//! the directory fan-out collapsed with a window function, and the
//! total counted before pagination is applied.

use anyhow::{Context, Result, bail};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use wavedeck_engine::correlate::NOT_FOUND_PLACEHOLDER;
use wavedeck_engine::page::ensure_page_size;
use wavedeck_model::{
    DEFAULT_PAGE_SIZE, Record, Region, Table, TableKind, Value, columns, format_iso_date,
};

pub const APP_NAME: &str = "wavedeck";

const DEFAULT_ISSUE_TYPES: [&str; 4] = ["Bug", "Task", "Story", "Incident"];
const DEFAULT_ISSUE_STATUSES: [&str; 4] = ["Open", "In Progress", "Resolved", "Closed"];
const DEFAULT_PRIORITIES: [&str; 4] = ["Critical", "High", "Medium", "Low"];

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "tracker_projects",
        &["id", "pkey", "pname", "region", "template_key"],
    ),
    ("issue_types", &["id", "name"]),
    ("issue_statuses", &["id", "name"]),
    ("priorities", &["id", "name"]),
    (
        "directory_users",
        &[
            "id",
            "user_name",
            "lower_user_name",
            "display_name",
            "email_address",
            "group_name",
        ],
    ),
    (
        "issues",
        &[
            "id",
            "issue_num",
            "project_id",
            "summary",
            "description",
            "issue_type_id",
            "status_id",
            "priority_id",
            "assignee",
            "reporter",
            "created_at",
            "updated_at",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_issues_project_id",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_issues_project_id ON issues (project_id);",
    },
    RequiredIndex {
        name: "idx_issues_assignee",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_issues_assignee ON issues (assignee);",
    },
    RequiredIndex {
        name: "idx_issues_reporter",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_issues_reporter ON issues (reporter);",
    },
    RequiredIndex {
        name: "idx_directory_users_lower_user_name",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_directory_users_lower_user_name ON directory_users (lower_user_name);",
    },
    RequiredIndex {
        name: "idx_tracker_projects_region",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_tracker_projects_region ON tracker_projects (region);",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub pkey: String,
    pub pname: String,
    pub region: Region,
    pub template_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectoryUser {
    pub user_name: String,
    pub display_name: String,
    pub email_address: String,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
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

/// Exact-match issue filters. Empty or absent fields do not
/// constrain; present fields compare case-insensitively against the
/// stored value, never as substrings. `assignee` and `reporter`
/// compare against the directory display name shown in result rows,
/// not the raw username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub status: Option<String>,
    pub issue_type: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub project_key: Option<String>,
    pub issue_key: Option<String>,
}

impl SearchFilters {
    fn active(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (":status", self.status.as_deref()),
            (":issue_type", self.issue_type.as_deref()),
            (":assignee", self.assignee.as_deref()),
            (":reporter", self.reporter.as_deref()),
            (":project_key", self.project_key.as_deref()),
            (":issue_key", self.issue_key.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value?.trim();
            if value.is_empty() { None } else { Some((name, value)) }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub filters: SearchFilters,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    pub id: i64,
    pub project_key: String,
    pub project_name: String,
    pub issue_num: i64,
    pub issue_key: String,
    pub summary: String,
    pub issue_type: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub assignee_display: String,
    pub reporter: String,
    pub reporter_display: String,
    pub created_at: String,
    pub updated_at: String,
}

impl IssueRow {
    /// Flattens the row into the generic record shape the in-memory
    /// predicate layer filters and exports.
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(10);
        record.push(
            columns::ISSUE_PROJECT_KEY,
            Value::Text(self.project_key.clone()),
        );
        record.push(columns::ISSUE_NUMBER, Value::Number(self.issue_num as f64));
        record.push("Summary", Value::Text(self.summary.clone()));
        record.push("Issue Type", Value::Text(self.issue_type.clone()));
        record.push("Status", Value::Text(self.status.clone()));
        record.push("Priority", Value::Text(self.priority.clone()));
        record.push("Assignee", Value::Text(self.assignee_display.clone()));
        record.push("Reporter", Value::Text(self.reporter_display.clone()));
        record.push("Created", Value::Text(self.created_at.clone()));
        record.push("Updated", Value::Text(self.updated_at.clone()));
        record
    }
}

/// One page of search results. `total` is the match count before
/// `LIMIT`/`OFFSET`, so callers can render page controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub page: usize,
    pub page_size: usize,
    pub total: i64,
    pub results: Vec<IssueRow>,
}

/// Issue count for one project key; `count` is `None` when the key
/// does not resolve to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub project_key: String,
    pub count: Option<i64>,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;

        self.seed_defaults()?;
        Ok(())
    }

    pub fn seed_defaults(&self) -> Result<()> {
        for issue_type in DEFAULT_ISSUE_TYPES {
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO issue_types (name) VALUES (?)",
                    params![issue_type],
                )
                .with_context(|| format!("insert default issue type {issue_type}"))?;
        }
        for status in DEFAULT_ISSUE_STATUSES {
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO issue_statuses (name) VALUES (?)",
                    params![status],
                )
                .with_context(|| format!("insert default issue status {status}"))?;
        }
        for priority in DEFAULT_PRIORITIES {
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO priorities (name) VALUES (?)",
                    params![priority],
                )
                .with_context(|| format!("insert default priority {priority}"))?;
        }
        Ok(())
    }

    pub fn create_project(&self, project: &NewProject) -> Result<i64> {
        self.conn
            .execute(
                "
                INSERT INTO tracker_projects (pkey, pname, region, template_key)
                VALUES (?, ?, ?, ?)
                ",
                params![
                    project.pkey,
                    project.pname,
                    project.region.as_str(),
                    project.template_key,
                ],
            )
            .with_context(|| format!("insert project {}", project.pkey))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_directory_user(&self, user: &NewDirectoryUser) -> Result<i64> {
        self.conn
            .execute(
                "
                INSERT INTO directory_users
                  (user_name, lower_user_name, display_name, email_address, group_name)
                VALUES (?, ?, ?, ?, ?)
                ",
                params![
                    user.user_name,
                    user.user_name.to_lowercase(),
                    user.display_name,
                    user.email_address,
                    user.group_name,
                ],
            )
            .with_context(|| format!("insert directory user {}", user.user_name))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_issue(&self, issue: &NewIssue) -> Result<i64> {
        let project_id = self
            .project_id(&issue.project_key)?
            .with_context(|| format!("unknown project key {}", issue.project_key))?;
        let issue_type_id = self.lookup_id("issue_types", &issue.issue_type)?;
        let status_id = self.lookup_id("issue_statuses", &issue.status)?;
        let priority_id = self.lookup_id("priorities", &issue.priority)?;

        self.conn
            .execute(
                "
                INSERT INTO issues
                  (issue_num, project_id, summary, description, issue_type_id,
                   status_id, priority_id, assignee, reporter, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
                params![
                    issue.issue_num,
                    project_id,
                    issue.summary,
                    issue.description,
                    issue_type_id,
                    status_id,
                    priority_id,
                    issue.assignee,
                    issue.reporter,
                    issue.created_at,
                    issue.updated_at,
                ],
            )
            .with_context(|| {
                format!("insert issue {}-{}", issue.project_key, issue.issue_num)
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Paginated exact-match issue search. The directory join can
    /// duplicate an issue once per matching directory row; the window
    /// function keeps exactly the first copy per issue id.
    pub fn search_issues(&self, request: &SearchRequest) -> Result<SearchResponse> {
        ensure_page_size(request.page_size)?;

        let mut clauses = String::new();
        let mut bound: Vec<(&'static str, Box<dyn ToSql>)> = Vec::new();
        for (name, value) in request.filters.active() {
            let column = match name {
                ":status" => "LOWER(s.name)",
                ":issue_type" => "LOWER(t.name)",
                ":assignee" => "LOWER(du.display_name)",
                ":reporter" => "LOWER(dr.display_name)",
                ":project_key" => "LOWER(p.pkey)",
                // Compared only after concatenation, never split back
                // into its parts.
                ":issue_key" => "LOWER(p.pkey || '-' || CAST(i.issue_num AS TEXT))",
                other => bail!("unsupported filter parameter {other}"),
            };
            clauses.push_str(&format!(" AND {column} = LOWER({name})"));
            bound.push((name, Box::new(value.to_owned())));
        }

        let cte = format!(
            "
            WITH matches AS (
              SELECT
                i.id AS id,
                i.issue_num AS issue_num,
                p.pkey AS pkey,
                p.pname AS pname,
                i.summary AS summary,
                COALESCE(t.name, '') AS issue_type,
                COALESCE(s.name, '') AS status,
                COALESCE(pr.name, '') AS priority,
                i.assignee AS assignee,
                du.display_name AS assignee_display,
                i.reporter AS reporter,
                dr.display_name AS reporter_display,
                i.created_at AS created_at,
                i.updated_at AS updated_at,
                ROW_NUMBER() OVER (PARTITION BY i.id ORDER BY i.id ASC) AS rn
              FROM issues i
              JOIN tracker_projects p ON p.id = i.project_id
              LEFT JOIN issue_types t ON t.id = i.issue_type_id
              LEFT JOIN issue_statuses s ON s.id = i.status_id
              LEFT JOIN priorities pr ON pr.id = i.priority_id
              LEFT JOIN directory_users du ON du.lower_user_name = LOWER(i.assignee)
              LEFT JOIN directory_users dr ON dr.lower_user_name = LOWER(i.reporter)
              WHERE 1 = 1{clauses}
            )
            "
        );

        let filter_params: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(name, value)| (*name, value.as_ref()))
            .collect();

        let total: i64 = self
            .conn
            .query_row(
                &format!("{cte} SELECT COUNT(*) FROM matches WHERE rn = 1"),
                &filter_params[..],
                |row| row.get(0),
            )
            .context("count issue matches")?;

        let limit = request.page_size as i64;
        let offset = (request.page as i64).saturating_mul(limit);
        let mut page_params = filter_params;
        page_params.push((":limit", &limit));
        page_params.push((":offset", &offset));

        let mut stmt = self
            .conn
            .prepare(&format!(
                "
                {cte}
                SELECT id, issue_num, pkey, pname, summary, issue_type, status,
                       priority, assignee, assignee_display, reporter,
                       reporter_display, created_at, updated_at
                FROM matches
                WHERE rn = 1
                ORDER BY id ASC
                LIMIT :limit OFFSET :offset
                "
            ))
            .context("prepare issue search")?;
        let rows = stmt
            .query_map(&page_params[..], |row| {
                let project_key: String = row.get(2)?;
                let issue_num: i64 = row.get(1)?;
                let assignee_display: Option<String> = row.get(9)?;
                let reporter_display: Option<String> = row.get(11)?;
                Ok(IssueRow {
                    id: row.get(0)?,
                    issue_key: format!("{project_key}-{issue_num}"),
                    project_key,
                    project_name: row.get(3)?,
                    issue_num,
                    summary: row.get(4)?,
                    issue_type: row.get(5)?,
                    status: row.get(6)?,
                    priority: row.get(7)?,
                    assignee: row.get(8)?,
                    assignee_display: assignee_display
                        .unwrap_or_else(|| NOT_FOUND_PLACEHOLDER.to_owned()),
                    reporter: row.get(10)?,
                    reporter_display: reporter_display
                        .unwrap_or_else(|| NOT_FOUND_PLACEHOLDER.to_owned()),
                    created_at: row.get(12)?,
                    updated_at: row.get(13)?,
                })
            })
            .context("query issues")?;

        let results = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect issues")?;
        Ok(SearchResponse {
            page: request.page,
            page_size: request.page_size,
            total,
            results,
        })
    }

    /// Issue count for one project key. Unknown keys are an error so
    /// the summary layer can distinguish "no issues" from "no such
    /// project".
    pub fn issue_count(&self, project_key: &str) -> Result<i64> {
        let project_id = self
            .project_id(project_key)?
            .with_context(|| format!("unknown project key {project_key}"))?;
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM issues WHERE project_id = ?",
                params![project_id],
                |row| row.get(0),
            )
            .with_context(|| format!("count issues for {project_key}"))
    }

    /// Counts issues for each key independently. A key that fails to
    /// resolve yields `count: None` instead of aborting the batch.
    pub fn issue_count_summary(&self, project_keys: &[String]) -> Vec<CountEntry> {
        project_keys
            .iter()
            .map(|project_key| CountEntry {
                project_key: project_key.clone(),
                count: self.issue_count(project_key).ok(),
            })
            .collect()
    }

    /// Materializes the projects sheet shape straight from the store:
    /// one row per project with the latest issue update normalized to
    /// a calendar date.
    pub fn projects_table(&self, region: Option<Region>) -> Result<Table> {
        let region_label = region.map(Region::as_str);
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT p.template_key, p.pkey, p.pname, p.region, MAX(i.updated_at)
                FROM tracker_projects p
                LEFT JOIN issues i ON i.project_id = p.id
                WHERE :region IS NULL OR p.region = :region
                GROUP BY p.id
                ORDER BY p.pkey ASC
                ",
            )
            .context("prepare projects query")?;
        let rows = stmt
            .query_map(
                &[(":region", &region_label as &dyn ToSql)][..],
                |row| {
                    let template_key: String = row.get(0)?;
                    let pkey: String = row.get(1)?;
                    let pname: String = row.get(2)?;
                    let region: String = row.get(3)?;
                    let updated: Option<String> = row.get(4)?;
                    Ok((template_key, pkey, pname, region, updated))
                },
            )
            .context("query projects")?;

        let mut table = Table::new(TableKind::Projects.as_str(), TableKind::Projects.schema());
        for row in rows {
            let (template_key, pkey, pname, region, updated) =
                row.context("scan project row")?;
            // A row with a mangled timestamp loses its date, not the
            // whole view.
            let last_updated = updated
                .as_deref()
                .and_then(|raw| parse_date(raw).ok())
                .map_or(Value::Null, Value::Date);
            let mut record = Record::with_capacity(5);
            record.push(columns::TEMPLATE_KEY, Value::Text(template_key));
            record.push(columns::PROJECT_KEY, Value::Text(pkey));
            record.push(columns::PROJECT_NAME, Value::Text(pname));
            record.push(columns::LAST_ISSUE_UPDATED, last_updated);
            record.push(columns::REGION, Value::Text(region));
            table.push(record);
        }
        Ok(table)
    }

    fn project_id(&self, project_key: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM tracker_projects WHERE LOWER(pkey) = LOWER(?)",
                params![project_key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("look up project {project_key}"))
    }

    fn lookup_id(&self, table: &'static str, name: &str) -> Result<Option<i64>> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        self.conn
            .execute(
                &format!("INSERT OR IGNORE INTO {table} (name) VALUES (?)"),
                params![name],
            )
            .with_context(|| format!("ensure {table} entry {name}"))?;
        let id = self
            .conn
            .query_row(
                &format!("SELECT id FROM {table} WHERE name = ?"),
                params![name],
                |row| row.get(0),
            )
            .with_context(|| format!("look up {table} entry {name}"))?;
        Ok(Some(id))
    }
}

pub fn validate_db_path(path: &str) -> Result<()> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        bail!("database path is empty");
    }
    if trimmed.starts_with("file:") || trimmed.contains("://") {
        bail!("database path must be a plain filesystem path, got {trimmed:?}");
    }
    if trimmed.contains('?') {
        bail!("database path must not carry URI parameters, got {trimmed:?}");
    }
    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a wavedeck-compatible database or migrate first"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; run migration before launching",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

/// Timestamp strings arrive in several shapes depending on which tool
/// wrote them; try the common ones before giving up.
pub fn parse_datetime(raw: &str) -> Result<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(value);
    }

    if let Ok(value) = OffsetDateTime::parse(
        raw,
        &format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
    ) {
        return Ok(value);
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    ) {
        return Ok(value.assume_utc());
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Ok(value.assume_utc());
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Ok(value.assume_utc());
    }

    bail!("unsupported datetime format {raw:?}")
}

pub fn parse_date(raw: &str) -> Result<Date> {
    if let Ok(value) = Date::parse(raw, &format_description!("[year]-[month]-[day]")) {
        return Ok(value);
    }

    // Some writers store date columns as full timestamps.
    let date_time = parse_datetime(raw)?;
    Ok(date_time.date())
}

pub fn format_date(date: Date) -> String {
    format_iso_date(date)
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_datetime, validate_db_path};
    use time::Month;

    #[test]
    fn validate_db_path_rejects_uri_forms() {
        assert!(validate_db_path("file:test.db").is_err());
        assert!(validate_db_path("https://example.com/db.sqlite").is_err());
        assert!(validate_db_path("db.sqlite?mode=ro").is_err());
        assert!(validate_db_path("/tmp/wavedeck.db").is_ok());
    }

    #[test]
    fn parse_datetime_accepts_common_shapes() {
        for raw in [
            "2021-01-01T09:30:00Z",
            "2021-01-01 09:30:00+00:00",
            "2021-01-01 09:30:00.123",
            "2021-01-01 09:30:00",
            "2021-01-01T09:30:00",
        ] {
            let parsed = parse_datetime(raw).unwrap_or_else(|error| {
                panic!("expected {raw:?} to parse: {error:#}");
            });
            assert_eq!(parsed.date().year(), 2021);
        }
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn parse_date_normalizes_timestamps_to_dates() {
        let from_date = parse_date("2021-03-15").expect("plain date");
        assert_eq!(from_date.month(), Month::March);

        let from_timestamp = parse_date("2021-03-15 18:00:00").expect("timestamp");
        assert_eq!(from_timestamp, from_date);
    }
}
