//! `[[groups]]` section configuration.
//!
//! Each group declares which items belong to it and how its pages are laid
//! out. Search criteria live in an explicit `search` table rather than
//! being scraped from unrecognized keys, so typos in group options fail at
//! parse time instead of silently becoming match criteria.
//!
//! # Example
//! ```toml
//! [[groups]]
//! name = "blog"
//! path = "blog/{num}"
//! per_page = 10
//! date_format = "%Y/%m"
//! date_page_layout = "years/months"
//!
//! [groups.search]
//! category = "post"
//! featured = true
//! ```

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How multiple search criteria combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Every criterion must hold.
    #[default]
    All,
    /// At least one criterion must hold.
    Any,
}

/// A single search criterion.
///
/// A boolean tests for property presence (`true` = must exist, `false` =
/// must not); a string is compared against the property value, or against
/// each element when the property is a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Present(bool),
    Equals(String),
}

/// One `[[groups]]` entry in strata.toml.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Group name, also substituted for `{group}` in path patterns.
    pub name: String,

    /// Properties an item must carry to join this group.
    /// Omitting the table entirely makes every item a member.
    #[serde(default)]
    pub search: Option<BTreeMap<String, CriterionValue>>,

    /// Per-group override of the top-level `search_type`.
    #[serde(default)]
    pub search_type: Option<SearchType>,

    /// Item property whose values split the group into buckets
    /// (e.g. "tags" buckets items per tag).
    #[serde(default)]
    pub expose: Option<String>,

    /// Pin the exposed property to one value instead of bucketing
    /// per value.
    #[serde(default)]
    pub expose_value: Option<String>,

    /// Items per listing page. Omitted = everything on one page.
    #[serde(default)]
    pub per_page: Option<usize>,

    /// Path pattern for listing pages. The literal pattern `{title}`
    /// disables listing pages for the group.
    #[serde(default = "defaults::group::path")]
    #[educe(Default = defaults::group::path())]
    pub path: String,

    /// Rendering of the `{num}` token, itself a pattern
    /// (e.g. "page/{num}").
    #[serde(default)]
    pub num_format: Option<String>,

    /// strftime pattern bucketing the group by date, one hierarchy level
    /// per `/`-separated segment (e.g. "%Y/%m").
    #[serde(default)]
    pub date_format: Option<String>,

    /// Layout per date hierarchy level, slash-separated
    /// (e.g. "years/months"). Required alongside `date_format`.
    #[serde(default)]
    pub date_page_layout: Option<String>,

    /// Layout attached to the group's listing pages.
    #[serde(default = "defaults::group::page_layout")]
    #[educe(Default = defaults::group::page_layout())]
    pub page_layout: String,

    /// Description attached to the group's listing pages.
    #[serde(default)]
    pub page_description: Option<String>,

    /// Sort buckets oldest-first instead of newest-first.
    #[serde(default)]
    pub reverse: bool,

    /// Re-derive member permalinks from this group's `path` instead of the
    /// permalink group's. Setting `false` on the permalink group itself
    /// additionally suppresses its listing pages; setting `true` on
    /// another group makes that group emit item pages too.
    #[serde(default)]
    pub override_permalink: Option<bool>,

    /// Emit listing pages only, never per-item pages.
    #[serde(default)]
    pub page_only: bool,

    /// Emit `path.html` instead of `path/index.html`.
    #[serde(default)]
    pub no_folder: bool,

    /// File extension for emitted pages.
    #[serde(default = "defaults::group::extension")]
    #[educe(Default = defaults::group::extension())]
    pub change_extension: String,

    /// Extra properties written onto every member item, in order.
    /// Later entries win on key collisions.
    #[serde(default)]
    pub add_prop: Vec<BTreeMap<String, Value>>,
}

impl GroupConfig {
    /// The effective search type, falling back to the top-level setting.
    pub fn search_type_or(&self, global: SearchType) -> SearchType {
        self.search_type.unwrap_or(global)
    }
}
