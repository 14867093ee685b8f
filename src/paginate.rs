//! Listing-page pagination.
//!
//! Splits a sorted bucket into pages and wires the navigation between
//! them. Sibling links are value types carrying just enough to build a
//! pager, so pages serialize without cycles.

use crate::item::Item;
use serde::Serialize;
use std::sync::Arc;

/// Link to a sibling listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub num: usize,
    pub path: String,
    pub permalink: String,
}

impl PageRef {
    fn of(page: &Page) -> Self {
        Self {
            num: page.pagination.num,
            path: page.path.clone(),
            permalink: page.permalink.clone(),
        }
    }
}

/// Pagination state attached to one listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    /// Zero-based position in the chain.
    pub index: usize,
    /// One-based page number.
    pub num: usize,
    /// Page count of the whole chain.
    pub total: usize,
    /// The slice of the bucket shown on this page.
    pub files: Vec<Arc<Item>>,
    /// Every page of the chain, this one included.
    pub pages: Vec<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    /// Permalink of the final page, for "jump to last" links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages_permalink: Option<String>,
}

/// One emitted listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub layout: String,
    pub group: String,
    /// Starts empty; the template layer renders into it.
    pub contents: String,
    pub pagination: Pagination,
    pub path: String,
    pub permalink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_description: Option<String>,
    /// Dimension this page belongs to, e.g. `tags` or `dates`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed: Option<String>,
    /// Value within the dimension, e.g. `rust` or `2017/03`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_value: Option<String>,
}

/// Everything about a listing page except its pagination wiring.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub layout: String,
    pub group: String,
    pub path: String,
    pub permalink: String,
    pub page_description: Option<String>,
    pub exposed: Option<String>,
    pub exposed_value: Option<String>,
}

/// Split a sorted file list into listing pages.
///
/// `page_for` supplies the shell (path, permalink, layout) for each page
/// index. Without `per_page` everything lands on one page; an empty
/// bucket still yields one empty page. Once the chain is complete every
/// page carries the full sibling list and the final page's permalink.
pub fn paginate(
    files: &[Arc<Item>],
    per_page: Option<usize>,
    mut page_for: impl FnMut(usize) -> PageShell,
) -> Vec<Page> {
    let per_page = per_page.unwrap_or(files.len()).max(1);
    let total = files.len().div_ceil(per_page).max(1);

    let mut pages: Vec<Page> = Vec::with_capacity(total);
    for index in 0..total {
        let shell = page_for(index);
        let start = index * per_page;
        let end = ((index + 1) * per_page).min(files.len());
        let mut page = Page {
            layout: shell.layout,
            group: shell.group,
            contents: String::new(),
            pagination: Pagination {
                index,
                num: index + 1,
                total,
                files: files[start..end].to_vec(),
                pages: Vec::new(),
                prev: None,
                next: None,
                total_pages_permalink: None,
            },
            path: shell.path,
            permalink: shell.permalink,
            page_description: shell.page_description,
            exposed: shell.exposed,
            exposed_value: shell.exposed_value,
        };
        if index > 0 {
            page.pagination.prev = Some(PageRef::of(&pages[index - 1]));
            let this_ref = PageRef::of(&page);
            pages[index - 1].pagination.next = Some(this_ref);
        }
        pages.push(page);
    }

    let refs: Vec<PageRef> = pages.iter().map(PageRef::of).collect();
    let last_permalink = pages.last().map(|page| page.permalink.clone());
    for page in &mut pages {
        page.pagination.pages = refs.clone();
        page.pagination.total_pages_permalink = last_permalink.clone();
    }

    pages
}

// =============================================================================
// Tests
// =============================================================================
