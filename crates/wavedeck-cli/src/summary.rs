// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Builds the rendered dashboard out of the three loaded sheets plus
//! the current view state. All heavy lifting lives in the engine
//! crate; this module wires panels together and formats text output.

use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::path::Path;
use wavedeck_engine::correlate::{Directory, MemberRow};
use wavedeck_engine::page::{Page, clamp_page_index, page};
use wavedeck_engine::{dedup_by_id, filter, filter_table, group_by_key, template_keys};
use wavedeck_model::{
    DashboardState, FilterSpec, PanelKind, Record, Table, TableKind, columns, format_iso_date,
};
use wavedeck_sheet::load_table;

/// One line of the template overview: project cardinality after
/// dedup plus the latest issue update across the group.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSummaryRow {
    pub template_key: String,
    pub project_count: usize,
    pub latest_update: Option<time::Date>,
}

/// Drill-down for one template key.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedPanel {
    pub template_key: String,
    pub projects: Page<Record>,
    pub members: Page<MemberRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub region: String,
    pub rows: Vec<TemplateSummaryRow>,
    pub expanded: Option<ExpandedPanel>,
    pub single_users: Page<Record>,
    pub security_users: Page<Record>,
}

/// The three record sets backing one dashboard render. Loaded once
/// and treated as an immutable snapshot.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub projects: Table,
    pub single_users: Table,
    pub security_users: Table,
}

impl DashboardData {
    pub fn load(sheets_dir: &Path) -> Result<Self> {
        let projects = load_table(&sheets_dir.join("projects.csv"), TableKind::Projects)?;
        let single_users =
            load_table(&sheets_dir.join("single_users.csv"), TableKind::SingleUsers)?;
        let security_users = load_table(
            &sheets_dir.join("security_group_users.csv"),
            TableKind::SecurityUsers,
        )?;
        Ok(Self {
            projects,
            single_users,
            security_users,
        })
    }

    pub fn demo(seed: u64) -> Self {
        let projects = wavedeck_testkit::sample_projects(seed, 40);
        let security_users = wavedeck_testkit::sample_security_users(seed.wrapping_add(1), 25);
        let single_users =
            wavedeck_testkit::sample_single_users(seed.wrapping_add(2), 30, &security_users);
        Self {
            projects,
            single_users,
            security_users,
        }
    }

    pub fn template_keys(&self) -> Vec<String> {
        template_keys(&self.projects, columns::TEMPLATE_KEY)
    }

    /// Region-scoped projects with the template search box applied.
    fn project_view(&self, state: &DashboardState) -> Vec<&Record> {
        let mut spec = FilterSpec::new().exact(columns::REGION, state.region.as_str());
        if !state.template_filter.is_empty() {
            spec = spec.substring(columns::TEMPLATE_KEY, state.template_filter.clone());
        }
        let scoped = filter_table(&self.projects, &spec);
        dedup_by_id(&scoped, columns::PROJECT_KEY)
    }

    pub fn summarize(&self, state: &DashboardState) -> Summary {
        let deduped = self.project_view(state);
        let groups = group_by_key(&deduped, columns::TEMPLATE_KEY);

        let rows = groups
            .iter()
            .map(|group| TemplateSummaryRow {
                template_key: group.key.clone(),
                project_count: group.count(),
                latest_update: group.latest_update(columns::LAST_ISSUE_UPDATED),
            })
            .collect();

        let expanded = state
            .expanded_template
            .as_deref()
            .map(|template| self.expand(state, template, &deduped));

        Summary {
            region: state.region.as_str().to_owned(),
            rows,
            expanded,
            single_users: self.user_panel(state, PanelKind::SingleUsers),
            security_users: self.user_panel(state, PanelKind::SecurityUsers),
        }
    }

    /// Region-scoped rows of one standalone user table, with that
    /// panel's own column filters applied.
    pub fn user_view(&self, state: &DashboardState, panel: PanelKind) -> Vec<&Record> {
        let table = match panel {
            PanelKind::SingleUsers => &self.single_users,
            PanelKind::SecurityUsers => &self.security_users,
            PanelKind::Expanded => return Vec::new(),
        };
        let spec = state
            .filters(panel)
            .clone()
            .exact(columns::REGION, state.region.as_str());
        filter_table(table, &spec)
    }

    fn user_panel(&self, state: &DashboardState, panel: PanelKind) -> Page<Record> {
        let owned: Vec<Record> = self
            .user_view(state, panel)
            .into_iter()
            .cloned()
            .collect();
        page(
            &owned,
            clamp_page_index(owned.len(), *state.page(panel), state.page_size),
            state.page_size,
        )
    }

    /// The full filtered projects view of the expanded template, not
    /// just the visible page. Export writes this.
    pub fn expanded_projects(&self, state: &DashboardState, template: &str) -> Vec<&Record> {
        let deduped = self.project_view(state);
        let scoped: Vec<&Record> = deduped
            .into_iter()
            .filter(|record| record.text(columns::TEMPLATE_KEY) == template)
            .collect();
        filter(scoped, &state.expanded_filters)
    }

    fn expand(&self, state: &DashboardState, template: &str, deduped: &[&Record]) -> ExpandedPanel {
        let scoped: Vec<&Record> = deduped
            .iter()
            .copied()
            .filter(|record| record.text(columns::TEMPLATE_KEY) == template)
            .collect();
        let filtered = filter(scoped, &state.expanded_filters);
        let owned: Vec<Record> = filtered.into_iter().cloned().collect();
        let project_page = page(
            &owned,
            clamp_page_index(owned.len(), state.expanded_page, state.page_size),
            state.page_size,
        );

        let member_spec = state
            .single_filters
            .clone()
            .exact(columns::USER_TEMPLATE_KEY, template)
            .exact(columns::REGION, state.region.as_str());
        let users = filter_table(&self.single_users, &member_spec);
        let users = dedup_by_id(&users, columns::USER_SOE_ID);
        let directory = Directory::index(&self.security_users);
        let members = directory.member_rows(&users);
        let member_page = page(
            &members,
            clamp_page_index(members.len(), state.single_page, state.page_size),
            state.page_size,
        );

        ExpandedPanel {
            template_key: template.to_owned(),
            projects: project_page,
            members: member_page,
        }
    }
}

pub fn render(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Region: {}", summary.region);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<24} {:>8}  {}",
        "Template Key", "Projects", "Last Issue Updated"
    );
    for row in &summary.rows {
        let latest = row
            .latest_update
            .map(format_iso_date)
            .unwrap_or_else(|| "-".to_owned());
        let _ = writeln!(
            out,
            "{:<24} {:>8}  {latest}",
            row.template_key, row.project_count
        );
    }
    if summary.rows.is_empty() {
        let _ = writeln!(out, "(no templates match)");
    }

    if let Some(expanded) = &summary.expanded {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "== {} (page {} of {} projects) ==",
            expanded.template_key,
            expanded.projects.page_index + 1,
            expanded.projects.total_count
        );
        for record in &expanded.projects.items {
            let _ = writeln!(
                out,
                "  {:<12} {:<32} {}",
                record.text(columns::PROJECT_KEY),
                record.text(columns::PROJECT_NAME),
                record.text(columns::LAST_ISSUE_UPDATED)
            );
        }

        let _ = writeln!(
            out,
            "-- members (page {} of {} users) --",
            expanded.members.page_index + 1,
            expanded.members.total_count
        );
        for member in &expanded.members.items {
            let _ = writeln!(
                out,
                "  {:<12} {:<24} {:<32} {}",
                member.soe_id, member.display_name, member.email, member.group
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "== single users (page {} of {} rows) ==",
        summary.single_users.page_index + 1,
        summary.single_users.total_count
    );
    for record in &summary.single_users.items {
        let _ = writeln!(
            out,
            "  {:<12} {:<24} {}",
            record.text(columns::USER_SOE_ID),
            record.text(columns::USER_TEMPLATE_KEY),
            record.text(columns::REGION)
        );
    }

    let _ = writeln!(
        out,
        "== security group users (page {} of {} rows) ==",
        summary.security_users.page_index + 1,
        summary.security_users.total_count
    );
    for record in &summary.security_users.items {
        let _ = writeln!(
            out,
            "  {:<12} {:<24} {:<32} {}",
            record.text(columns::USER_NAME),
            record.text(columns::DISPLAY_NAME),
            record.text(columns::EMAIL_ADDRESS),
            record.text(columns::GROUP_NAME)
        );
    }
    out
}

/// Writes the expanded template's filtered projects next to the
/// sheets, named after the group key.
pub fn export_expanded(
    data: &DashboardData,
    state: &DashboardState,
    template: &str,
    out_dir: &Path,
) -> Result<std::path::PathBuf> {
    let records = data.expanded_projects(state, template);
    if records.is_empty() {
        bail!("template {template:?} has no projects in region {}", state.region.as_str());
    }
    let path = out_dir.join(wavedeck_sheet::export_filename(template));
    wavedeck_sheet::write_export(&path, data.projects.schema(), &records)
        .with_context(|| format!("export template {template}"))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{DashboardData, export_expanded, render};
    use anyhow::Result;
    use wavedeck_model::{DashboardCommand, DashboardState, PanelKind, Region, columns};

    fn demo_state(data: &DashboardData) -> (DashboardState, String) {
        let mut state = DashboardState::default();
        // Pick a template that is guaranteed to have NAM projects.
        let template = data
            .projects
            .records()
            .iter()
            .find(|record| record.text(columns::REGION) == "NAM")
            .map(|record| record.text(columns::TEMPLATE_KEY))
            .expect("demo data has NAM projects");
        state.dispatch(DashboardCommand::SelectRegion(Region::Nam));
        state.dispatch(DashboardCommand::ToggleExpanded(template.clone()));
        (state, template)
    }

    #[test]
    fn summary_counts_deduplicated_projects_per_template() {
        let data = DashboardData::demo(42);
        let state = DashboardState::default();
        let summary = data.summarize(&state);

        assert!(!summary.rows.is_empty());
        let total: usize = summary.rows.iter().map(|row| row.project_count).sum();
        let nam_rows = data
            .projects
            .records()
            .iter()
            .filter(|record| record.text(columns::REGION) == "NAM")
            .count();
        assert!(total <= nam_rows, "dedup can only shrink the view");
        assert!(summary.expanded.is_none());
    }

    #[test]
    fn expanding_a_template_pages_projects_and_members() {
        let data = DashboardData::demo(7);
        let (state, template) = demo_state(&data);
        let summary = data.summarize(&state);

        let expanded = summary.expanded.expect("expanded panel");
        assert_eq!(expanded.template_key, template);
        assert!(expanded.projects.items.len() <= state.page_size);
        for record in &expanded.projects.items {
            assert_eq!(record.text(columns::TEMPLATE_KEY), template);
        }
        assert!(expanded.members.items.len() <= state.page_size);
    }

    #[test]
    fn standalone_user_panels_are_region_scoped_and_independently_filtered() {
        let data = DashboardData::demo(17);
        let mut state = DashboardState::default();
        let summary = data.summarize(&state);

        let nam_single = data
            .single_users
            .records()
            .iter()
            .filter(|record| record.text(columns::REGION) == "NAM")
            .count();
        assert_eq!(summary.single_users.total_count, nam_single);
        for record in &summary.single_users.items {
            assert_eq!(record.text(columns::REGION), "NAM");
        }
        assert!(summary.security_users.total_count > 0);
        for record in &summary.security_users.items {
            assert_eq!(record.text(columns::REGION), "NAM");
        }

        // A panel filter narrows its own panel and nothing else.
        let needle = data
            .single_users
            .records()
            .iter()
            .find(|record| record.text(columns::REGION) == "NAM")
            .map(|record| record.text(columns::USER_SOE_ID))
            .expect("demo data has NAM single users");
        state.dispatch(DashboardCommand::SetPanelFilter {
            panel: PanelKind::SingleUsers,
            field: columns::USER_SOE_ID.to_owned(),
            value: needle.clone(),
        });
        let filtered = data.summarize(&state);
        assert!(filtered.single_users.total_count >= 1);
        assert!(filtered.single_users.total_count <= summary.single_users.total_count);
        for record in &filtered.single_users.items {
            assert!(record.text(columns::USER_SOE_ID).contains(&needle));
        }
        assert_eq!(
            filtered.security_users.total_count,
            summary.security_users.total_count
        );
    }

    #[test]
    fn region_switch_changes_the_view() {
        let data = DashboardData::demo(11);
        let mut state = DashboardState::default();
        let nam = data.summarize(&state);
        state.dispatch(DashboardCommand::SelectRegion(Region::Apac));
        let apac = data.summarize(&state);

        assert_eq!(apac.region, "APAC");
        assert_ne!(nam.rows, apac.rows);
    }

    #[test]
    fn render_includes_templates_and_counts() {
        let data = DashboardData::demo(3);
        let (state, template) = demo_state(&data);
        let text = render(&data.summarize(&state));

        assert!(text.contains("Region: NAM"));
        assert!(text.contains(&template));
        assert!(text.contains("members"));
        assert!(text.contains("single users"));
        assert!(text.contains("security group users"));
    }

    #[test]
    fn export_writes_a_reloadable_sheet() -> Result<()> {
        let data = DashboardData::demo(5);
        let (state, template) = demo_state(&data);
        let dir = tempfile::tempdir()?;

        let path = export_expanded(&data, &state, &template, dir.path())?;
        assert!(path.file_name().is_some());

        let reloaded = wavedeck_sheet::load_table(&path, wavedeck_model::TableKind::Projects)?;
        assert!(!reloaded.is_empty());
        for record in reloaded.records() {
            assert_eq!(record.text(columns::TEMPLATE_KEY), template);
        }
        Ok(())
    }

    #[test]
    fn unknown_template_export_fails_with_context() {
        let data = DashboardData::demo(9);
        let state = DashboardState::default();
        let dir = tempfile::tempdir().expect("tempdir");

        let error = export_expanded(&data, &state, "NO-SUCH-KEY", dir.path())
            .expect_err("missing template should fail");
        assert!(error.to_string().contains("NO-SUCH-KEY"));
    }

    #[test]
    fn sheets_round_trip_through_the_loader() -> Result<()> {
        let data = DashboardData::demo(13);
        let dir = tempfile::tempdir()?;

        for (table, name) in [
            (&data.projects, "projects.csv"),
            (&data.single_users, "single_users.csv"),
            (&data.security_users, "security_group_users.csv"),
        ] {
            let bytes = wavedeck_sheet::serialize(table.schema(), table.records());
            std::fs::write(dir.path().join(name), bytes)?;
        }

        let loaded = DashboardData::load(dir.path())?;
        assert_eq!(loaded.projects.records(), data.projects.records());
        assert_eq!(loaded.single_users.len(), data.single_users.len());
        assert_eq!(loaded.security_users.len(), data.security_users.len());
        Ok(())
    }
}
