//! Content item model.
//!
//! Items arrive from the loader as front-matter-shaped records. Known
//! fields are typed; everything else (tags, draft markers, custom fields)
//! lives in `props` and round-trips through serialization untouched.

use crate::utils::date;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single piece of content flowing through a run.
///
/// Items are mutated while groups prepare them (permalink derivation,
/// `add_prop` assignments, the contents snapshot) and then frozen behind
/// `Arc` so every bucket and page shares one copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    /// Loader-side identifier (usually the source file path), carried for
    /// error messages.
    #[serde(default)]
    pub id: String,

    /// Required by classification time; its absence aborts the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Raw date string, parsed on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Explicit slug, substituted for `{title}` verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Canonical permalink. Derived during classification unless the
    /// loader pre-set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    #[serde(default)]
    pub contents: String,

    /// Snapshot of `contents` taken before any group touches the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_contents: Option<String>,

    /// Everything else from the loader.
    #[serde(flatten)]
    pub props: BTreeMap<String, Value>,
}

impl Item {
    /// The item's date, if it carries one that parses.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(date::parse_item_date)
    }

    /// Whether the item is marked as unpublished.
    ///
    /// Recognizes `draft = true` (or `"true"`), `published = false` (or
    /// `"false"`) and `status = "draft"`.
    pub fn is_draft(&self) -> bool {
        flag_matches(self.props.get("draft"), true)
            || flag_matches(self.props.get("published"), false)
            || self.props.get("status").and_then(Value::as_str) == Some("draft")
    }

    /// Look up any property, typed fields included.
    pub fn prop(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(Value::String(self.id.clone())),
            "title" => self.title.clone().map(Value::String),
            "date" => self.date.clone().map(Value::String),
            "slug" => self.slug.clone().map(Value::String),
            "permalink" => self.permalink.clone().map(Value::String),
            "contents" => Some(Value::String(self.contents.clone())),
            "original_contents" => self.original_contents.clone().map(Value::String),
            _ => self.props.get(key).cloned(),
        }
    }

    /// The values of a property as strings, for bucketing by exposed
    /// dimension. A list yields its elements, a bare string yields
    /// itself, anything else yields nothing.
    pub fn prop_values(&self, key: &str) -> Vec<String> {
        match self.prop(key) {
            Some(Value::Array(values)) => values.iter().map(value_to_string).collect(),
            Some(Value::String(value)) => vec![value],
            _ => Vec::new(),
        }
    }

    /// Set a property, routing known names through their typed fields
    /// so serialization never emits a key twice.
    pub fn set_prop(&mut self, key: &str, value: Value) {
        fn text(value: Value) -> Option<String> {
            match value {
                Value::Null => None,
                Value::String(text) => Some(text),
                other => Some(value_to_string(&other)),
            }
        }

        match key {
            "id" => self.id = text(value).unwrap_or_default(),
            "title" => self.title = text(value),
            "date" => self.date = text(value),
            "slug" => self.slug = text(value),
            "permalink" => self.permalink = text(value),
            "contents" => self.contents = text(value).unwrap_or_default(),
            "original_contents" => self.original_contents = text(value),
            _ => {
                self.props.insert(key.to_owned(), value);
            }
        }
    }
}

/// A `true`/`"true"`-style flag check, matching how front matter loaders
/// hand booleans through as either type.
fn flag_matches(value: Option<&Value>, expected: bool) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag == expected,
        Some(Value::String(flag)) => flag == if expected { "true" } else { "false" },
        _ => false,
    }
}

/// String coercion for criteria and exposure values.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::Null => "null".into(),
        other => other.to_string(),
    }
}
