//! Run output: the emitted page map and the site-wide index.

use crate::item::Item;
use crate::paginate::Page;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a run produces.
#[derive(Debug, Default, Serialize)]
pub struct RunOutput {
    /// Emitted pages keyed by output path. Later writers win, so two
    /// groups rendering to the same path leave one page.
    pub pages: BTreeMap<String, OutputPage>,
    /// Site-wide metadata for templates.
    pub site: SiteIndex,
}

impl RunOutput {
    pub(crate) fn insert(&mut self, path: String, page: OutputPage) {
        self.pages.insert(path, page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A page in the output map.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutputPage {
    Listing(Page),
    Item(ItemPage),
}

/// A per-item page re-pathed to its permalink.
///
/// Serializes as the item itself with the page fields folded in, the way
/// templates expect to read it.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    #[serde(flatten)]
    pub item: Arc<Item>,
    pub path: String,
    pub group: String,
    #[serde(skip_serializing_if = "ItemPagination::is_empty")]
    pub pagination: ItemPagination,
}

/// Sequential navigation between the item pages of one group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemPagination {
    /// The next-newer item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Arc<Item>>,
    /// The next-older item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Arc<Item>>,
}

impl ItemPagination {
    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// Site-wide metadata collected while emitting listing pages.
#[derive(Debug, Default, Serialize)]
pub struct SiteIndex {
    /// Per exposed dimension, every value with its slug and item count.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub exposed: BTreeMap<String, BTreeMap<String, ExposedEntry>>,
    /// Date hierarchy with an entry per full-depth bucket.
    #[serde(skip_serializing_if = "DateNode::is_empty")]
    pub dates: DateNode,
}

impl SiteIndex {
    pub(crate) fn record_exposed(
        &mut self,
        dimension: &str,
        value: &str,
        nicename: String,
        count: usize,
    ) {
        self.exposed
            .entry(dimension.to_owned())
            .or_default()
            .insert(value.to_owned(), ExposedEntry { nicename, count });
    }

    /// File a date entry under its `/`-separated key. Intermediate nodes
    /// are created as needed and existing children survive, so shallow
    /// and deep groups can share a tree.
    pub(crate) fn record_date(&mut self, key: &str, entry: DateEntry) {
        let mut node = &mut self.dates;
        for segment in key.split('/') {
            node = node.children.entry(segment.to_owned()).or_default();
        }
        node.entry = Some(entry);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposedEntry {
    /// Slugified form of the value, for building links.
    pub nicename: String,
    pub count: usize,
}

/// One level of the date hierarchy.
///
/// Children are keyed by the next path segment; `entry` is set when a
/// bucket key terminates exactly here. A node can hold both at once,
/// e.g. `2017` with children `03`, `11`.
#[derive(Debug, Default, Serialize)]
pub struct DateNode {
    #[serde(flatten)]
    pub children: BTreeMap<String, DateNode>,
    #[serde(flatten)]
    pub entry: Option<DateEntry>,
}

impl DateNode {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.entry.is_none()
    }

    /// Walk to the node at a `/`-separated key.
    pub fn at(&self, key: &str) -> Option<&DateNode> {
        let mut node = self;
        for segment in key.split('/') {
            node = node.children.get(segment)?;
        }
        Some(node)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateEntry {
    /// The bucket key itself.
    pub date: String,
    pub count: usize,
    pub files: Vec<Arc<Item>>,
}

// =============================================================================
// Tests
// =============================================================================
