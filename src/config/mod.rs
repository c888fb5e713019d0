//! Configuration and on-disk layout for valocker.
//!
//! Everything lives under one data directory:
//!
//! ```text
//! <data-dir>/
//!   settings.kdl     application settings (active profile, favorites, output)
//!   roster.kdl       optional roster override (see `crate::roster`)
//!   profiles/*.json  one snapshot per profile (see `crate::profile`)
//!   actions.log      JSONL command log
//! ```
//!
//! ## settings.kdl
//!
//! Contains:
//! - `active-profile` - Profile loaded at startup
//! - `favorite` - Profile pinned to the top of listings (repeatable)
//! - `output-format` - "json" or "human"
//! - `action-log` - `#false` disables the command log
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ACTION_LOG_FILE, DATA_DIR_ENV, DataPaths, PROFILES_DIR, Resolved, SETTINGS_FILE, ValueSource,
    resolve_output_format,
};
pub use schema::{OutputFormat, Settings};
