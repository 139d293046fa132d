// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::columns::Region;
use crate::filter::{FilterSpec, MatchMode};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The three independently paged panels of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Expanded,
    SingleUsers,
    SecurityUsers,
}

impl PanelKind {
    pub const ALL: [Self; 3] = [Self::Expanded, Self::SingleUsers, Self::SecurityUsers];
}

/// View state threaded through each operation. Transitions happen
/// only through [`DashboardState::dispatch`], which couples every
/// filter change to a page reset so a stale page index can never
/// survive a new filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub region: Region,
    pub template_filter: String,
    pub expanded_template: Option<String>,
    pub page_size: usize,
    pub expanded_page: usize,
    pub single_page: usize,
    pub security_page: usize,
    pub expanded_filters: FilterSpec,
    pub single_filters: FilterSpec,
    pub security_filters: FilterSpec,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            region: Region::Nam,
            template_filter: String::new(),
            expanded_template: None,
            page_size: DEFAULT_PAGE_SIZE,
            expanded_page: 0,
            single_page: 0,
            security_page: 0,
            expanded_filters: FilterSpec::new(),
            single_filters: FilterSpec::new(),
            security_filters: FilterSpec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCommand {
    SelectRegion(Region),
    SetTemplateFilter(String),
    ToggleExpanded(String),
    SetPanelFilter {
        panel: PanelKind,
        field: String,
        value: String,
    },
    NextPage {
        panel: PanelKind,
        total_count: usize,
    },
    PrevPage(PanelKind),
    SetPage {
        panel: PanelKind,
        page: usize,
        total_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    RegionChanged(Region),
    TemplateFilterChanged(String),
    ExpandedChanged(Option<String>),
    PanelFilterChanged(PanelKind),
    PageChanged { panel: PanelKind, page: usize },
}

impl DashboardState {
    pub fn dispatch(&mut self, command: DashboardCommand) -> Vec<DashboardEvent> {
        match command {
            DashboardCommand::SelectRegion(region) => {
                self.region = region;
                let mut events = vec![DashboardEvent::RegionChanged(region)];
                events.extend(self.reset_all_pages());
                events
            }
            DashboardCommand::SetTemplateFilter(template) => {
                self.template_filter = template.clone();
                let mut events = vec![DashboardEvent::TemplateFilterChanged(template)];
                events.extend(self.reset_all_pages());
                events
            }
            DashboardCommand::ToggleExpanded(template) => {
                self.expanded_template = if self.expanded_template.as_deref() == Some(&template) {
                    None
                } else {
                    Some(template)
                };
                let mut events = vec![DashboardEvent::ExpandedChanged(
                    self.expanded_template.clone(),
                )];
                events.extend(self.reset_page(PanelKind::Expanded));
                events
            }
            DashboardCommand::SetPanelFilter { panel, field, value } => {
                self.filters_mut(panel).set(field, value, MatchMode::Substring);
                let mut events = vec![DashboardEvent::PanelFilterChanged(panel)];
                events.extend(self.reset_page(panel));
                events
            }
            DashboardCommand::NextPage { panel, total_count } => {
                let page = *self.page(panel);
                if (page + 1) * self.page_size < total_count {
                    *self.page_mut(panel) = page + 1;
                    vec![DashboardEvent::PageChanged {
                        panel,
                        page: page + 1,
                    }]
                } else {
                    Vec::new()
                }
            }
            DashboardCommand::PrevPage(panel) => {
                let page = *self.page(panel);
                if page == 0 {
                    return Vec::new();
                }
                *self.page_mut(panel) = page - 1;
                vec![DashboardEvent::PageChanged {
                    panel,
                    page: page - 1,
                }]
            }
            DashboardCommand::SetPage {
                panel,
                page,
                total_count,
            } => {
                let last = total_count.saturating_sub(1) / self.page_size.max(1);
                let target = page.min(last);
                if target == *self.page(panel) {
                    return Vec::new();
                }
                *self.page_mut(panel) = target;
                vec![DashboardEvent::PageChanged {
                    panel,
                    page: target,
                }]
            }
        }
    }

    pub fn page(&self, panel: PanelKind) -> &usize {
        match panel {
            PanelKind::Expanded => &self.expanded_page,
            PanelKind::SingleUsers => &self.single_page,
            PanelKind::SecurityUsers => &self.security_page,
        }
    }

    pub fn filters(&self, panel: PanelKind) -> &FilterSpec {
        match panel {
            PanelKind::Expanded => &self.expanded_filters,
            PanelKind::SingleUsers => &self.single_filters,
            PanelKind::SecurityUsers => &self.security_filters,
        }
    }

    fn page_mut(&mut self, panel: PanelKind) -> &mut usize {
        match panel {
            PanelKind::Expanded => &mut self.expanded_page,
            PanelKind::SingleUsers => &mut self.single_page,
            PanelKind::SecurityUsers => &mut self.security_page,
        }
    }

    fn filters_mut(&mut self, panel: PanelKind) -> &mut FilterSpec {
        match panel {
            PanelKind::Expanded => &mut self.expanded_filters,
            PanelKind::SingleUsers => &mut self.single_filters,
            PanelKind::SecurityUsers => &mut self.security_filters,
        }
    }

    fn reset_page(&mut self, panel: PanelKind) -> Vec<DashboardEvent> {
        if *self.page(panel) == 0 {
            return Vec::new();
        }
        *self.page_mut(panel) = 0;
        vec![DashboardEvent::PageChanged { panel, page: 0 }]
    }

    fn reset_all_pages(&mut self) -> Vec<DashboardEvent> {
        PanelKind::ALL
            .into_iter()
            .flat_map(|panel| self.reset_page(panel))
            .collect()
    }
}
