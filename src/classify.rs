//! Item preparation and placement.
//!
//! Runs every item through the group list in document order: match,
//! prepare (contents snapshot, permalink, `add_prop`), then decide where
//! the group files it. Preparation mutates the item, so a property added
//! by an earlier group is visible to every later group's criteria. Once
//! all groups have had their turn the item is frozen behind `Arc` and the
//! collected placements land in the store.

use crate::config::{Config, GroupConfig};
use crate::error::RunError;
use crate::item::Item;
use crate::matcher;
use crate::paths::{self, PathSubs};
use crate::store::GroupStore;
use crate::utils::date;
use smallvec::SmallVec;
use std::sync::Arc;

/// Where one group files an item.
#[derive(Debug)]
enum Slot {
    /// The flat list, plus one bucket per cumulative date key.
    Flat { date_keys: Vec<String> },
    /// One exposed-value bucket.
    Value(String),
}

#[derive(Debug)]
struct Placement {
    group: String,
    slot: Slot,
}

type Placements = SmallVec<[Placement; 4]>;

/// Classify a collection into the store.
pub fn classify_into(
    items: Vec<Item>,
    config: &Config,
    make_safe: &dyn Fn(&str) -> String,
    store: &mut GroupStore,
) -> Result<(), RunError> {
    for mut item in items {
        if !config.drafts && item.is_draft() {
            continue;
        }

        let mut placements = Placements::new();
        for group in &config.groups {
            let search_type = group.search_type_or(config.search_type);
            if !matcher::matches(&item, search_type, group.search.as_ref(), None) {
                continue;
            }
            prepare(&mut item, group, config, make_safe)?;
            route(&item, group, &mut placements);
        }
        if placements.is_empty() {
            continue;
        }

        let frozen = Arc::new(item);
        for placement in placements {
            match placement.slot {
                Slot::Flat { date_keys } => {
                    store.push(&placement.group, frozen.clone());
                    store.push_date_segments(&placement.group, &date_keys, &frozen);
                }
                Slot::Value(value) => {
                    store.push_value(&placement.group, &value, frozen.clone());
                }
            }
        }
    }
    Ok(())
}

/// Prepare an item for membership of `group`.
///
/// Takes the contents snapshot, settles the permalink and applies the
/// group's `add_prop` assignments. The permalink is derived once from the
/// permalink group's pattern; a group that declares `override_permalink`
/// (either value) re-derives it from its own pattern.
fn prepare(
    item: &mut Item,
    group: &GroupConfig,
    config: &Config,
    make_safe: &dyn Fn(&str) -> String,
) -> Result<(), RunError> {
    let Some(title) = item.title.clone() else {
        return Err(RunError::MissingTitle(item.id.clone()));
    };

    if item.original_contents.is_none() {
        item.original_contents = Some(item.contents.clone());
    }

    // explicit slugs are taken verbatim
    let title_sub = match &item.slug {
        Some(slug) => slug.clone(),
        None => make_safe(&title),
    };

    if item.permalink.is_none() {
        if let Some(permalink_group) = config.group(&config.permalink_group) {
            item.permalink = Some(derive_permalink(
                item,
                &permalink_group.path,
                permalink_group.date_format.as_deref(),
                &group.name,
                &title_sub,
            ));
        }
    }
    if group.override_permalink.is_some() {
        item.permalink = Some(derive_permalink(
            item,
            &group.path,
            group.date_format.as_deref(),
            &group.name,
            &title_sub,
        ));
    }

    for assignment in &group.add_prop {
        for (key, value) in assignment {
            item.set_prop(key, value.clone());
        }
    }

    Ok(())
}

fn derive_permalink(
    item: &Item,
    pattern: &str,
    date_format: Option<&str>,
    group_name: &str,
    title_sub: &str,
) -> String {
    let date_sub = date_format.and_then(|format| {
        item.parsed_date()
            .and_then(|parsed| date::format_date(&parsed, format))
    });
    let subs = PathSubs {
        group: Some(group_name),
        title: Some(title_sub),
        date: date_sub.as_deref(),
        ..PathSubs::default()
    };
    paths::render_permalink(pattern, &subs)
}

/// Decide the group's placement for an item.
///
/// Exposed groups with a fixed `expose_value` file everything under that
/// value; otherwise one placement per value the item carries. Plain
/// groups take the flat slot, with date-segment keys when the group
/// buckets by date and the item's date parses.
fn route(item: &Item, group: &GroupConfig, placements: &mut Placements) {
    match (&group.expose, &group.expose_value) {
        (Some(_), Some(fixed)) => placements.push(Placement {
            group: group.name.clone(),
            slot: Slot::Value(fixed.clone()),
        }),
        (Some(dimension), None) => {
            for value in item.prop_values(dimension) {
                placements.push(Placement {
                    group: group.name.clone(),
                    slot: Slot::Value(value),
                });
            }
        }
        (None, _) => {
            let date_keys = match (&group.date_format, item.parsed_date()) {
                (Some(format), Some(parsed)) => date::segment_keys(&parsed, format),
                _ => Vec::new(),
            };
            placements.push(Placement {
                group: group.name.clone(),
                slot: Slot::Flat { date_keys },
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::slug::make_safe;
    use serde_json::json;

    fn config(toml: &str) -> Config {
        Config::from_str(toml).unwrap()
    }

    fn items(value: serde_json::Value) -> Vec<Item> {
        serde_json::from_value(value).unwrap()
    }

    fn run(config: &Config, collection: Vec<Item>) -> GroupStore {
        let mut store = GroupStore::new();
        classify_into(collection, config, &make_safe, &mut store).unwrap();
        store
    }

    #[test]
    fn test_missing_title_aborts() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            "#,
        );
        let mut store = GroupStore::new();
        let err = classify_into(
            items(json!([{ "id": "posts/x.md", "contents": "" }])),
            &config,
            &make_safe,
            &mut store,
        )
        .unwrap_err();

        assert!(err.to_string().contains("posts/x.md"));
        assert!(err.to_string().contains("missing a title"));
    }

    #[test]
    fn test_unmatched_items_leave_no_trace() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            [groups.search]
            category = "post"
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "Hello", "category": "page" }])),
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_drafts_are_skipped_unless_enabled() {
        let toml = r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
        "#;
        let collection = json!([
            { "title": "Live" },
            { "title": "WIP", "draft": true }
        ]);

        let store = run(&config(toml), items(collection.clone()));
        assert_eq!(store.get("blog").unwrap().files.len(), 1);

        let with_drafts = config(&format!("drafts = true\n{toml}"));
        let store = run(&with_drafts, items(collection));
        assert_eq!(store.get("blog").unwrap().files.len(), 2);
    }

    #[test]
    fn test_permalink_derived_from_permalink_group() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            path = "blog/{date}/{title}"
            date_format = "%Y/%m"
            date_page_layout = "years/months"
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "My Post", "date": "2017-03-05" }])),
        );

        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.permalink.as_deref(), Some("/blog/2017/03/my-post"));
    }

    #[test]
    fn test_permalink_uses_slug_verbatim() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            path = "{group}/{title}"
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "My Post", "slug": "Exact_Slug" }])),
        );

        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.permalink.as_deref(), Some("/blog/Exact_Slug"));
    }

    #[test]
    fn test_preset_permalink_wins() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "Hello", "permalink": "/keep/me" }])),
        );

        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.permalink.as_deref(), Some("/keep/me"));
    }

    #[test]
    fn test_override_redeclares_permalink() {
        // both override values re-derive; false only suppresses pages
        for declared in ["true", "false"] {
            let config = config(&format!(
                r#"
                permalink_group = "blog"
                [[groups]]
                name = "blog"
                [[groups]]
                name = "notes"
                override_permalink = {declared}
                path = "notes/{{title}}"
                "#
            ));
            let store = run(&config, items(json!([{ "title": "Hello" }])));

            let file = &store.get("notes").unwrap().files[0];
            assert_eq!(file.permalink.as_deref(), Some("/notes/hello"));
        }
    }

    #[test]
    fn test_permalink_renders_current_group_name() {
        // the permalink group's pattern, the matching group's name
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "notes"
            path = "{group}/{title}"
            [groups.search]
            kind = "note"
            [[groups]]
            name = "blog"
            path = "{group}/{title}"
            [groups.search]
            kind = "post"
            "#,
        );
        let store = run(&config, items(json!([{ "title": "Hello", "kind": "note" }])));

        let file = &store.get("notes").unwrap().files[0];
        assert_eq!(file.permalink.as_deref(), Some("/notes/hello"));
    }

    #[test]
    fn test_contents_snapshot_taken_once() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            [[groups]]
            name = "all"
            "#,
        );
        let store = run(&config, items(json!([{ "title": "Hello", "contents": "raw" }])));

        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.original_contents.as_deref(), Some("raw"));
    }

    #[test]
    fn test_add_prop_visible_to_later_groups() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            add_prop = [{ layout = "post" }]
            [[groups]]
            name = "layouts"
            [groups.search]
            layout = "post"
            "#,
        );
        let store = run(&config, items(json!([{ "title": "Hello" }])));

        assert_eq!(store.get("layouts").unwrap().files.len(), 1);
        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.props.get("layout"), Some(&json!("post")));
    }

    #[test]
    fn test_add_prop_later_entries_win() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            add_prop = [{ layout = "draft" }, { layout = "post" }]
            "#,
        );
        let store = run(&config, items(json!([{ "title": "Hello" }])));

        let file = &store.get("blog").unwrap().files[0];
        assert_eq!(file.props.get("layout"), Some(&json!("post")));
    }

    #[test]
    fn test_exposed_group_buckets_per_value() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            [[groups]]
            name = "tags"
            expose = "tags"
            "#,
        );
        let store = run(
            &config,
            items(json!([
                { "title": "A", "tags": ["rust", "web"] },
                { "title": "B", "tags": ["rust"] }
            ])),
        );

        let tags = store.get("tags").unwrap();
        assert_eq!(tags.by_value["rust"].files.len(), 2);
        assert_eq!(tags.by_value["web"].files.len(), 1);
        assert!(tags.files.is_empty());
    }

    #[test]
    fn test_exposed_group_ignores_unmatched_items() {
        // carrying values for the dimension does not bypass the criteria
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            [[groups]]
            name = "tags"
            expose = "tags"
            [groups.search]
            category = "post"
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "Hello", "category": "page", "tags": ["a", "b"] }])),
        );

        assert_eq!(store.get("blog").unwrap().files.len(), 1);
        assert!(store.get("tags").is_none());
    }

    #[test]
    fn test_fixed_expose_value_takes_matches_regardless() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "featured"
            expose = "tags"
            expose_value = "featured"
            [groups.search]
            promoted = true
            "#,
        );
        let store = run(
            &config,
            items(json!([{ "title": "A", "promoted": 1, "tags": ["rust"] }])),
        );

        let featured = store.get("featured").unwrap();
        assert_eq!(featured.by_value["featured"].files.len(), 1);
    }

    #[test]
    fn test_dated_group_fills_segment_buckets() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            date_format = "%Y/%m"
            date_page_layout = "years/months"
            "#,
        );
        let store = run(
            &config,
            items(json!([
                { "title": "A", "date": "2017-03-05" },
                { "title": "B", "date": "2017-11-20" },
                { "title": "Undated" }
            ])),
        );

        let blog = store.get("blog").unwrap();
        assert_eq!(blog.files.len(), 3);
        assert_eq!(blog.dates["2017"].files.len(), 2);
        assert_eq!(blog.dates["2017/03"].files.len(), 1);
        assert_eq!(blog.dates["2017/11"].files.len(), 1);
        // undated items never land in date buckets
        assert_eq!(blog.dates.len(), 3);
    }

    #[test]
    fn test_item_shared_across_groups() {
        let config = config(
            r#"
            permalink_group = "blog"
            [[groups]]
            name = "blog"
            [[groups]]
            name = "all"
            "#,
        );
        let store = run(&config, items(json!([{ "title": "Hello" }])));

        let a = &store.get("blog").unwrap().files[0];
        let b = &store.get("all").unwrap().files[0];
        assert!(Arc::ptr_eq(a, b));
    }
}
