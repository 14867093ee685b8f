//! Per-run group storage.
//!
//! Classification fills a [`GroupStore`] with shared [`Item`]s; emission
//! reads it back out. Each run owns its store, so concurrent runs never
//! observe each other.

use crate::config::GroupConfig;
use crate::item::Item;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Items sharing one exposed value or date segment.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    pub files: Vec<Arc<Item>>,
}

/// Runtime state of one group.
///
/// A group is filled through exactly one of its maps per run: exposed
/// groups use `by_value`, dated groups use `dates` alongside `files`,
/// plain groups use `files` alone.
#[derive(Debug, Default)]
pub struct Group {
    /// Flat member list in discovery order until sorted.
    pub files: Vec<Arc<Item>>,
    /// One bucket per exposed value.
    pub by_value: BTreeMap<String, Bucket>,
    /// Cumulative date-segment buckets, e.g. `2017` and `2017/03`.
    pub dates: BTreeMap<String, Bucket>,
}

/// All groups of one run, keyed by group name.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: BTreeMap<String, Group>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a group, creating it on first access.
    pub fn fetch(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_owned()).or_default()
    }

    /// A group that received at least one item, if any.
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Append to a group's flat list.
    pub fn push(&mut self, name: &str, item: Arc<Item>) {
        self.fetch(name).files.push(item);
    }

    /// Append to one exposed-value bucket.
    pub fn push_value(&mut self, name: &str, value: &str, item: Arc<Item>) {
        self.fetch(name)
            .by_value
            .entry(value.to_owned())
            .or_default()
            .files
            .push(item);
    }

    /// Append to every cumulative date-segment bucket.
    pub fn push_date_segments(&mut self, name: &str, keys: &[String], item: &Arc<Item>) {
        let group = self.fetch(name);
        for key in keys {
            group
                .dates
                .entry(key.clone())
                .or_default()
                .files
                .push(item.clone());
        }
    }

    /// Sort every group according to its configuration.
    ///
    /// Exposed groups sort each value bucket, everything else sorts the
    /// flat list. Date-segment buckets keep discovery order, which is
    /// already document order. Groups are independent, so they sort in
    /// parallel.
    pub fn sort_all(&mut self, configs: &[GroupConfig]) {
        self.groups.par_iter_mut().for_each(|(name, group)| {
            let Some(config) = configs.iter().find(|config| &config.name == name) else {
                return;
            };
            if config.expose.is_some() {
                for bucket in group.by_value.values_mut() {
                    sort_files(&mut bucket.files, config.reverse);
                }
            } else {
                sort_files(&mut group.files, config.reverse);
            }
        });
    }

    /// Drop all group state, ready for another run.
    pub fn reset(&mut self) {
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Stable newest-first sort; undated items sink to the end in their
/// original order. `reverse` then mirrors the whole sequence.
fn sort_files(files: &mut [Arc<Item>], reverse: bool) {
    files.sort_by_cached_key(date_sort_key);
    if reverse {
        files.reverse();
    }
}

fn date_sort_key(item: &Arc<Item>) -> (bool, Reverse<Option<NaiveDateTime>>) {
    let parsed = item.parsed_date();
    (parsed.is_none(), Reverse(parsed))
}

// =============================================================================
// Tests
// =============================================================================
