//! Group membership predicate.
//!
//! A group's criteria table maps property names to expected values. Under
//! [`SearchType::All`] every criterion must hold, under [`SearchType::Any`]
//! one is enough. A group with no table at all takes everything.

use crate::config::{CriterionValue, SearchType};
use crate::item::{self, Item};
use serde_json::Value;
use std::collections::BTreeMap;

/// Optional string canonicalization applied to both sides of an equality
/// criterion, so `search = { category = "Build Logs" }` can match items
/// tagged `build-logs` when the caller normalizes with its slugifier.
pub type Normalize<'a> = Option<&'a dyn Fn(&str) -> String>;

/// Decide whether an item belongs to a group.
pub fn matches(
    item: &Item,
    search_type: SearchType,
    criteria: Option<&BTreeMap<String, CriterionValue>>,
    normalize: Normalize<'_>,
) -> bool {
    let Some(criteria) = criteria else {
        return true;
    };
    match search_type {
        SearchType::All => criteria
            .iter()
            .all(|(key, expected)| criterion_holds(item, key, expected, normalize)),
        SearchType::Any => criteria
            .iter()
            .any(|(key, expected)| criterion_holds(item, key, expected, normalize)),
    }
}

fn criterion_holds(
    item: &Item,
    key: &str,
    expected: &CriterionValue,
    normalize: Normalize<'_>,
) -> bool {
    let property = item.prop(key);
    match expected {
        // boolean criteria assert presence or absence, whatever the type
        CriterionValue::Present(true) => property.is_some(),
        CriterionValue::Present(false) => property.is_none(),
        CriterionValue::Equals(expected) => {
            let Some(property) = property else {
                return false;
            };
            let canon = |text: &str| match normalize {
                Some(normalize) => normalize(text),
                None => text.to_owned(),
            };
            let expected = canon(expected);
            match property {
                Value::String(actual) => canon(&actual) == expected,
                Value::Array(elements) => elements
                    .iter()
                    .any(|element| canon(item::value_to_string(element).trim()) == expected),
                _ => false,
            }
        }
    }
}
