//! Strata - group, paginate and cross-link content collections for
//! static sites.
//!
//! Feed it a flat collection of front-matter-shaped items and a TOML
//! group configuration; it hands back every listing page, item page and
//! site-wide index a template layer needs. No I/O happens here: loaders
//! and template engines live on either side of [`Engine::run`].
//!
//! The pipeline:
//!
//! | phase | module | result |
//! |-------|--------|--------|
//! | classify | [`classify`] | items matched, prepared and bucketed per group |
//! | sort | [`store`] | every bucket newest-first (stable, reversible) |
//! | emit | [`emit`] | paginated listings, item pages, [`output::SiteIndex`] |

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod item;
pub mod matcher;
pub mod output;
pub mod paginate;
pub mod paths;
pub mod store;
pub mod utils;

pub use config::{Config, GroupConfig, SearchType};
pub use emit::{Engine, MakeSafe};
pub use error::{ConfigError, RunError};
pub use item::Item;
pub use output::{ItemPage, OutputPage, RunOutput, SiteIndex};
pub use paginate::{Page, PageRef, Pagination};
