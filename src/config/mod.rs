//! Run configuration management for `strata.toml`.
//!
//! # Shape
//!
//! | Field             | Purpose                                          |
//! |-------------------|--------------------------------------------------|
//! | `drafts`          | Include draft items (default: false)             |
//! | `search_type`     | Default criteria combinator (`all` / `any`)      |
//! | `permalink_group` | Which group derives canonical item permalinks    |
//! | `[[groups]]`      | Group definitions (see [`group::GroupConfig`])   |
//!
//! # Example
//!
//! ```toml
//! drafts = false
//! permalink_group = "blog"
//!
//! [[groups]]
//! name = "blog"
//! path = "blog/{num}/{title}"
//! per_page = 10
//!
//! [[groups]]
//! name = "tags"
//! expose = "tags"
//! path = "tags/{expose}/{num}"
//! ```

pub mod defaults;
mod group;

pub use group::{CriterionValue, GroupConfig, SearchType};

use crate::error::ConfigError;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration structure representing strata.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Include items marked as drafts.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub drafts: bool,

    /// How search criteria combine when a group does not say.
    #[serde(default = "defaults::search_type")]
    #[educe(Default = defaults::search_type())]
    pub search_type: SearchType,

    /// Name of the group whose `path` derives item permalinks.
    pub permalink_group: String,

    /// Group definitions, processed in declaration order.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        let config = toml::from_str(&content)
            .map_err(|err| ConfigError::Parse(path.to_path_buf(), err))?;
        Ok(config)
    }

    /// Find a group definition by name.
    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.group(&self.permalink_group).is_none() {
            bail!(ConfigError::Invalid(format!(
                "[permalink_group] `{}` does not name a group",
                self.permalink_group
            )));
        }

        for group in &self.groups {
            let context = &group.name;

            if self.groups.iter().filter(|g| g.name == *context).count() > 1 {
                bail!(ConfigError::Invalid(format!(
                    "group `{context}` is defined more than once"
                )));
            }

            if group.per_page == Some(0) {
                bail!(ConfigError::Invalid(format!(
                    "[groups.per_page] must be at least 1 in group `{context}`"
                )));
            }

            if group.expose_value.is_some() && group.expose.is_none() {
                bail!(ConfigError::Invalid(format!(
                    "[groups.expose_value] requires [groups.expose] in group `{context}`"
                )));
            }

            if let Some(date_format) = &group.date_format {
                let Some(layout) = &group.date_page_layout else {
                    bail!(ConfigError::Invalid(format!(
                        "[groups.date_format] requires [groups.date_page_layout] in group `{context}`"
                    )));
                };
                let format_depth = date_format.split('/').count();
                let layout_depth = layout.split('/').count();
                if format_depth != layout_depth {
                    bail!(ConfigError::Invalid(format!(
                        "[groups.date_page_layout] has {layout_depth} level(s) but \
                         [groups.date_format] has {format_depth} in group `{context}`"
                    )));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
