//! Page emission and the engine facade.
//!
//! Two passes per group, both reading the sorted store. The listing pass
//! paginates each bucket into pages and feeds the site index; the item
//! pass re-paths every member of a permalink-owning group to its own
//! page with prev/next navigation.

use crate::classify;
use crate::config::{Config, GroupConfig};
use crate::error::RunError;
use crate::item::Item;
use crate::output::{DateEntry, ItemPage, ItemPagination, OutputPage, RunOutput};
use crate::paginate::{self, PageShell};
use crate::paths::{self, PathSubs};
use crate::store::{Group, GroupStore};
use crate::utils::date;
use crate::utils::slug;
use std::sync::Arc;

/// Slugifier used for `{title}` substitution and exposed-value nicenames.
pub type MakeSafe = Box<dyn Fn(&str) -> String + Send + Sync>;

/// The classification engine: configured once, run per collection.
///
/// ```
/// use strata::{Config, Engine, Item};
///
/// let config = Config::from_str(r#"
///     permalink_group = "blog"
///     [[groups]]
///     name = "blog"
///     path = "blog/{num}/{title}"
///     per_page = 10
/// "#)?;
/// config.validate()?;
///
/// let items: Vec<Item> = serde_json::from_str(
///     r#"[{ "title": "Hello", "date": "2017-03-05" }]"#,
/// )?;
/// let output = Engine::new(config).run(items)?;
/// assert!(output.pages.contains_key("blog/index.html"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Engine {
    config: Config,
    make_safe: MakeSafe,
}

impl Engine {
    /// An engine with the default slugifier.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            make_safe: Box::new(|text| slug::make_safe(text)),
        }
    }

    /// Replace the slugifier.
    pub fn with_make_safe(mut self, make_safe: MakeSafe) -> Self {
        self.make_safe = make_safe;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline over a collection: classify, sort, emit.
    ///
    /// Each run builds its own store, so one engine can serve concurrent
    /// runs from behind a shared reference.
    pub fn run(&self, items: Vec<Item>) -> Result<RunOutput, RunError> {
        if self.config.group(&self.config.permalink_group).is_none() {
            return Err(RunError::UnknownPermalinkGroup(
                self.config.permalink_group.clone(),
            ));
        }

        let mut store = GroupStore::new();
        classify::classify_into(items, &self.config, self.make_safe.as_ref(), &mut store)?;
        store.sort_all(&self.config.groups);

        let mut output = RunOutput::default();
        for group in &self.config.groups {
            self.emit_listing_pages(group, &store, &mut output);
            self.emit_item_pages(group, &store, &mut output);
        }
        Ok(output)
    }

    /// Emit a group's listing pages and record its site-index entries.
    fn emit_listing_pages(&self, group: &GroupConfig, store: &GroupStore, output: &mut RunOutput) {
        // pure item groups render no listings, and neither does the
        // permalink group when it opts out with `override_permalink = false`
        if group.path == "{title}" {
            return;
        }
        if group.name == self.config.permalink_group && group.override_permalink == Some(false) {
            return;
        }
        let Some(state) = store.get(&group.name) else {
            return;
        };

        for bucket in select_buckets(state, group) {
            self.record_site_entries(group, &bucket, output);

            let layout = bucket_layout(group, &bucket);
            let expose_sub = match (&group.expose_value, bucket.kind, bucket.key) {
                (Some(fixed), _, _) => Some((self.make_safe)(fixed)),
                (None, BucketKind::Value, Some(key)) => Some((self.make_safe)(key)),
                _ => None,
            };
            let date_sub = match bucket.kind {
                BucketKind::Date => bucket.key,
                _ => None,
            };
            let (exposed, exposed_value) = bucket_exposure(group, &bucket);

            let pages = paginate::paginate(bucket.files, group.per_page, |index| {
                let subs = PathSubs {
                    group: Some(&group.name),
                    num: (index > 0).then_some(index + 1),
                    date: date_sub,
                    expose: expose_sub.as_deref(),
                    title: None,
                };
                let rendered = paths::render(&group.path, &subs, group.num_format.as_deref());
                let (path, permalink) = if group.page_only && group.no_folder {
                    let bare = rendered.strip_suffix('/').unwrap_or(&rendered);
                    (
                        format!("{bare}{}", group.change_extension),
                        format!("/{bare}"),
                    )
                } else {
                    (
                        format!("{rendered}index{}", group.change_extension),
                        format!("/{rendered}"),
                    )
                };
                PageShell {
                    layout: layout.clone(),
                    group: group.name.clone(),
                    path,
                    permalink,
                    page_description: group.page_description.clone(),
                    exposed: exposed.clone(),
                    exposed_value: exposed_value.clone(),
                }
            });

            for page in pages {
                output.insert(page.path.clone(), OutputPage::Listing(page));
            }
        }
    }

    /// Emit per-item pages for a group that owns its members' permalinks.
    fn emit_item_pages(&self, group: &GroupConfig, store: &GroupStore, output: &mut RunOutput) {
        if group.page_only {
            return;
        }
        if group.name != self.config.permalink_group && group.override_permalink != Some(true) {
            return;
        }
        let Some(state) = store.get(&group.name) else {
            return;
        };

        for (position, item) in state.files.iter().enumerate() {
            let Some(permalink) = item.permalink.as_deref() else {
                continue;
            };
            let base = permalink.strip_prefix('/').unwrap_or(permalink);
            let path = if group.no_folder {
                format!("{base}{}", group.change_extension)
            } else {
                format!("{base}/index{}", group.change_extension)
            };
            let pagination = ItemPagination {
                prev: (position > 0).then(|| state.files[position - 1].clone()),
                next: state.files.get(position + 1).cloned(),
            };
            output.insert(
                path.clone(),
                OutputPage::Item(ItemPage {
                    item: item.clone(),
                    path,
                    group: group.name.clone(),
                    pagination,
                }),
            );
        }
    }

    fn record_site_entries(&self, group: &GroupConfig, bucket: &BucketRef<'_>, output: &mut RunOutput) {
        match bucket.kind {
            // fixed-value groups are navigation aids, not dimensions
            BucketKind::Value if group.expose_value.is_none() => {
                if let (Some(dimension), Some(key)) = (&group.expose, bucket.key) {
                    output.site.record_exposed(
                        dimension,
                        key,
                        (self.make_safe)(key),
                        bucket.files.len(),
                    );
                }
            }
            BucketKind::Date => {
                // only keys at the full date depth carry an entry
                if let (Some(format), Some(key)) = (&group.date_format, bucket.key) {
                    if date::parse_bucket_key(key, format).is_some() {
                        output.site.record_date(
                            key,
                            DateEntry {
                                date: key.to_owned(),
                                count: bucket.files.len(),
                                files: bucket.files.to_vec(),
                            },
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketKind {
    Flat,
    Value,
    Date,
}

struct BucketRef<'a> {
    kind: BucketKind,
    key: Option<&'a str>,
    files: &'a [Arc<Item>],
}

/// The buckets a group renders listing pages from, in a fixed precedence:
/// date segments when any exist, then the fixed exposed value, then every
/// exposed value, then the flat list.
fn select_buckets<'a>(state: &'a Group, group: &'a GroupConfig) -> Vec<BucketRef<'a>> {
    if !state.dates.is_empty() {
        return state
            .dates
            .iter()
            .map(|(key, bucket)| BucketRef {
                kind: BucketKind::Date,
                key: Some(key),
                files: &bucket.files,
            })
            .collect();
    }
    if let Some(fixed) = &group.expose_value {
        return state
            .by_value
            .get(fixed)
            .map(|bucket| BucketRef {
                kind: BucketKind::Value,
                key: Some(fixed.as_str()),
                files: &bucket.files,
            })
            .into_iter()
            .collect();
    }
    if group.expose.is_some() {
        return state
            .by_value
            .iter()
            .map(|(key, bucket)| BucketRef {
                kind: BucketKind::Value,
                key: Some(key),
                files: &bucket.files,
            })
            .collect();
    }
    vec![BucketRef {
        kind: BucketKind::Flat,
        key: None,
        files: &state.files,
    }]
}

/// Date buckets pick their layout by depth from `date_page_layout`;
/// everything else uses the group's page layout.
fn bucket_layout(group: &GroupConfig, bucket: &BucketRef<'_>) -> String {
    match (bucket.kind, &group.date_page_layout, bucket.key) {
        (BucketKind::Date, Some(layouts), Some(key)) => {
            let depth = key.split('/').count() - 1;
            layouts.split('/').nth(depth).unwrap_or_default().to_owned()
        }
        _ => group.page_layout.clone(),
    }
}

fn bucket_exposure(
    group: &GroupConfig,
    bucket: &BucketRef<'_>,
) -> (Option<String>, Option<String>) {
    match (&group.expose_value, &group.expose, bucket.kind, bucket.key) {
        (Some(fixed), expose, _, _) => (expose.clone(), Some(fixed.clone())),
        (None, Some(dimension), _, Some(key)) => (Some(dimension.clone()), Some(key.to_owned())),
        (None, None, BucketKind::Date, Some(key)) => {
            (Some("dates".to_owned()), Some(key.to_owned()))
        }
        _ => (None, None),
    }
}

// =============================================================================
// Tests
// =============================================================================
