// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 100;

/// One window over an ordered view. `total_count` is always the
/// filtered, pre-pagination length, never the unfiltered table's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: usize,
}

/// Slices `view[page_index * page_size ..][..page_size]`. An
/// out-of-range index yields an empty page; the operation never
/// fails and never wraps around.
pub fn page<T: Clone>(view: &[T], page_index: usize, page_size: usize) -> Page<T> {
    let offset = page_index.saturating_mul(page_size);
    let items = if offset >= view.len() {
        Vec::new()
    } else {
        view[offset..].iter().take(page_size).cloned().collect()
    };
    Page {
        items,
        page_index,
        page_size,
        total_count: view.len(),
    }
}

/// Last page index that still holds at least one item; 0 for an
/// empty view. Interactive paging clamps through this so a stale
/// index is never stored.
pub fn clamp_page_index(total_count: usize, page_index: usize, page_size: usize) -> usize {
    if total_count == 0 || page_size == 0 {
        return 0;
    }
    let last = (total_count - 1) / page_size;
    page_index.min(last)
}

/// Boundary check for network-facing paths. Rejected before the
/// request reaches the engine.
pub fn ensure_page_size(page_size: usize) -> Result<()> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        bail!(
            "page size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"
        );
    }
    Ok(())
}
