// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod summary;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use std::env;
use std::path::PathBuf;
use summary::DashboardData;
use wavedeck_db::{NewDirectoryUser, NewIssue, NewProject, SearchRequest, Store};
use wavedeck_model::{DashboardCommand, DashboardState, PanelKind, Region, columns};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `wavedeck --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let region = match &options.region {
        Some(raw) => Region::parse(raw)
            .ok_or_else(|| anyhow!("unknown region {raw:?}; expected NAM or APAC"))?,
        None => config.region(),
    };

    if options.counts || options.search.is_some() || options.check_only {
        let store = open_store(&db_path, options.demo)?;

        if options.check_only {
            if let Some(sheets_dir) = config.sheets_dir() {
                DashboardData::load(&sheets_dir)?;
            }
            return Ok(());
        }

        if let Some(raw) = &options.search {
            let request: SearchRequest =
                serde_json::from_str(raw).context("parse search request JSON")?;
            let response = store.search_issues(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        // --counts
        let projects = store.projects_table(Some(region))?;
        let keys: Vec<String> = projects
            .records()
            .iter()
            .map(|record| record.text(columns::PROJECT_KEY))
            .filter(|key| !key.is_empty())
            .collect();
        for entry in store.issue_count_summary(&keys) {
            match entry.count {
                Some(count) => println!("{:<16} {count}", entry.project_key),
                None => println!("{:<16} -", entry.project_key),
            }
        }
        return Ok(());
    }

    let data = if options.demo {
        DashboardData::demo(options.seed)
    } else {
        let sheets_dir = config.sheets_dir().ok_or_else(|| {
            anyhow!(
                "no sheets directory configured; set [storage].sheets_dir in {} or WAVEDECK_SHEETS_DIR",
                options.config_path.display()
            )
        })?;
        DashboardData::load(&sheets_dir)
            .with_context(|| "load dashboard sheets".to_owned())?
    };

    let mut state = DashboardState {
        page_size: config.page_size(),
        ..DashboardState::default()
    };
    state.dispatch(DashboardCommand::SelectRegion(region));

    if let Some(template) = &options.template {
        let known = data.template_keys();
        if !known.iter().any(|key| key == template) {
            bail!(
                "unknown template key {template:?}; available: {}",
                known.join(", ")
            );
        }
        state.dispatch(DashboardCommand::ToggleExpanded(template.clone()));
    }
    for (panel, filters) in [
        (PanelKind::Expanded, &options.filters),
        (PanelKind::SingleUsers, &options.user_filters),
        (PanelKind::SecurityUsers, &options.security_filters),
    ] {
        for (field, value) in filters {
            state.dispatch(DashboardCommand::SetPanelFilter {
                panel,
                field: field.clone(),
                value: value.clone(),
            });
        }
    }

    // Page requests go through dispatch so they clamp against the
    // filtered view instead of storing a stale index.
    if let Some(template) = &options.template {
        let total = data.expanded_projects(&state, template).len();
        state.dispatch(DashboardCommand::SetPage {
            panel: PanelKind::Expanded,
            page: options.page,
            total_count: total,
        });
    }
    for (panel, requested) in [
        (PanelKind::SingleUsers, options.user_page),
        (PanelKind::SecurityUsers, options.security_page),
    ] {
        let total = data.user_view(&state, panel).len();
        state.dispatch(DashboardCommand::SetPage {
            panel,
            page: requested,
            total_count: total,
        });
    }

    if options.export {
        let template = options
            .template
            .as_deref()
            .ok_or_else(|| anyhow!("--export requires --template <key>"))?;
        let out_dir = match config.sheets_dir() {
            Some(dir) if !options.demo => dir,
            _ => env::current_dir().context("resolve current directory")?,
        };
        let path = summary::export_expanded(&data, &state, template, &out_dir)?;
        println!("{}", path.display());
        return Ok(());
    }

    print!("{}", summary::render(&data.summarize(&state)));
    Ok(())
}

fn open_store(db_path: &std::path::Path, demo: bool) -> Result<Store> {
    let store = if demo {
        Store::open_memory()?
    } else {
        Store::open(db_path).with_context(|| {
            format!(
                "open database {} -- if this path is wrong, set [storage].db_path or WAVEDECK_DB_PATH",
                db_path.display()
            )
        })?
    };
    store.bootstrap()?;
    if demo {
        seed_demo_store(&store, 42)?;
    }
    Ok(store)
}

/// Seeds the in-memory demo store from the same deterministic sample
/// data that backs the demo sheets.
fn seed_demo_store(store: &Store, seed: u64) -> Result<()> {
    let projects = wavedeck_testkit::sample_projects(seed, 40);
    let mut seen: Vec<String> = Vec::new();
    for record in projects.records() {
        let pkey = record.text(columns::PROJECT_KEY);
        if pkey.is_empty() || seen.contains(&pkey) {
            continue;
        }
        seen.push(pkey.clone());
        let region = Region::parse(&record.text(columns::REGION)).unwrap_or(Region::Nam);
        store.create_project(&NewProject {
            pkey,
            pname: record.text(columns::PROJECT_NAME),
            region,
            template_key: record.text(columns::TEMPLATE_KEY),
        })?;
    }

    let security = wavedeck_testkit::sample_security_users(seed.wrapping_add(1), 25);
    for record in security.records() {
        store.create_directory_user(&NewDirectoryUser {
            user_name: record.text(columns::USER_NAME),
            display_name: record.text(columns::DISPLAY_NAME),
            email_address: record.text(columns::EMAIL_ADDRESS),
            group_name: record.text(columns::GROUP_NAME),
        })?;
    }

    for issue in wavedeck_testkit::sample_issues(seed.wrapping_add(2), &projects) {
        if !seen.contains(&issue.project_key) {
            continue;
        }
        store.create_issue(&NewIssue {
            project_key: issue.project_key,
            issue_num: issue.issue_num,
            summary: issue.summary,
            description: issue.description,
            issue_type: issue.issue_type,
            status: issue.status,
            priority: issue.priority,
            assignee: issue.assignee,
            reporter: issue.reporter,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        })?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    demo: bool,
    seed: u64,
    region: Option<String>,
    template: Option<String>,
    filters: Vec<(String, String)>,
    user_filters: Vec<(String, String)>,
    security_filters: Vec<(String, String)>,
    page: usize,
    user_page: usize,
    security_page: usize,
    export: bool,
    counts: bool,
    search: Option<String>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        demo: false,
        seed: 42,
        region: None,
        template: None,
        filters: Vec::new(),
        user_filters: Vec::new(),
        security_filters: Vec::new(),
        page: 0,
        user_page: 0,
        security_page: 0,
        export: false,
        counts: false,
        search: None,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--seed" => {
                let value = iter.next().ok_or_else(|| anyhow!("--seed requires a number"))?;
                options.seed = value
                    .as_ref()
                    .parse()
                    .map_err(|_| anyhow!("--seed requires a number, got {:?}", value.as_ref()))?;
            }
            "--region" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--region requires NAM or APAC"))?;
                options.region = Some(value.as_ref().to_owned());
            }
            "--template" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--template requires a template key"))?;
                options.template = Some(value.as_ref().to_owned());
            }
            flag @ ("--filter" | "--user-filter" | "--security-filter") => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{flag} requires field=value"))?;
                let raw = value.as_ref();
                let (field, text) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("{flag} requires field=value, got {raw:?}"))?;
                let entry = (field.trim().to_owned(), text.trim().to_owned());
                match flag {
                    "--filter" => options.filters.push(entry),
                    "--user-filter" => options.user_filters.push(entry),
                    _ => options.security_filters.push(entry),
                }
            }
            flag @ ("--page" | "--user-page" | "--security-page") => {
                let value = iter.next().ok_or_else(|| anyhow!("{flag} requires a number"))?;
                let page = value
                    .as_ref()
                    .parse()
                    .map_err(|_| anyhow!("{flag} requires a number, got {:?}", value.as_ref()))?;
                match flag {
                    "--page" => options.page = page,
                    "--user-page" => options.user_page = page,
                    _ => options.security_page = page,
                }
            }
            "--export" => {
                options.export = true;
            }
            "--counts" => {
                options.counts = true;
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a JSON request"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("wavedeck");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config, database, and sheets");
    println!("  --demo                   Run against seeded in-memory demo data");
    println!("  --seed <n>               Demo data seed (default 42)");
    println!("  --region <NAM|APAC>      Region scope for the dashboard");
    println!("  --template <key>         Expand one template key");
    println!("  --filter <field=value>   Substring filter on the expanded panel");
    println!("  --user-filter <f=v>      Substring filter on the single-users panel");
    println!("  --security-filter <f=v>  Substring filter on the security-users panel");
    println!("  --page <n>               Page of the expanded panel (0-based)");
    println!("  --user-page <n>          Page of the single-users panel (0-based)");
    println!("  --security-page <n>      Page of the security-users panel (0-based)");
    println!("  --export                 Export the expanded template's projects");
    println!("  --counts                 Print per-project issue counts from the store");
    println!("  --search <json>          Run an issue search request, print JSON");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::parse_cli_args;
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/wavedeck-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(options.config_path, default_options_path());
        assert!(!options.demo);
        assert!(options.region.is_none());
        assert_eq!(options.page, 0);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_collects_dashboard_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--region",
                "APAC",
                "--template",
                "WAVE-CRM",
                "--filter",
                "Active Project Name=portal",
                "--page",
                "2",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.region.as_deref(), Some("APAC"));
        assert_eq!(options.template.as_deref(), Some("WAVE-CRM"));
        assert_eq!(
            options.filters,
            vec![("Active Project Name".to_owned(), "portal".to_owned())]
        );
        assert_eq!(options.page, 2);
        Ok(())
    }

    #[test]
    fn parse_cli_args_collects_user_panel_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--user-filter",
                "User SOE ID=ab",
                "--security-filter",
                "GROUP_NAME=admins",
                "--user-page",
                "1",
                "--security-page",
                "3",
            ],
            default_options_path(),
        )?;
        assert_eq!(
            options.user_filters,
            vec![("User SOE ID".to_owned(), "ab".to_owned())]
        );
        assert_eq!(
            options.security_filters,
            vec![("GROUP_NAME".to_owned(), "admins".to_owned())]
        );
        assert_eq!(options.user_page, 1);
        assert_eq!(options.security_page, 3);
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_malformed_filter() {
        let error = parse_cli_args(vec!["--filter", "no-equals"], default_options_path())
            .expect_err("filter without = should fail");
        assert!(error.to_string().contains("field=value"));
    }

    #[test]
    fn parse_cli_args_sets_store_modes() -> Result<()> {
        let options = parse_cli_args(
            vec!["--counts", "--search", "{}", "--demo", "--seed", "7"],
            default_options_path(),
        )?;
        assert!(options.counts);
        assert_eq!(options.search.as_deref(), Some("{}"));
        assert!(options.demo);
        assert_eq!(options.seed, 7);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
