#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` holds the diagnostics plumbing shared by the workspace. Library
//! code emits standard [`tracing`] events through the subsystem macros
//! ([`trace_perms!`], [`trace_own!`], [`trace_group!`], [`trace_content!`]);
//! applications pick a [`VerbosityConfig`] and call [`init_tracing`] once.
//!
//! # Targets
//!
//! | Target               | Events                              |
//! |----------------------|-------------------------------------|
//! | `filestate::perms`   | permission comparison and `chmod`   |
//! | `filestate::own`     | owner lookup and `chown`            |
//! | `filestate::group`   | group lookup and `chown`            |
//! | `filestate::content` | content comparison and rewrite      |
//!
//! Applied changes are logged at `INFO`, decisions that leave an attribute
//! untouched at `DEBUG`.
//!
//! # Examples
//!
//! ```
//! use logging::{VerbosityConfig, env_filter};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! let _filter = env_filter(&config);
//! assert_eq!(config.directive(), "filestate=debug");
//! ```

mod config;
mod tracing_init;
mod tracing_macros;

pub use config::{MAX_VERBOSE_LEVEL, VerbosityConfig};
pub use tracing_init::{env_filter, init_tracing};

/// Common prefix of every target emitted by the workspace.
pub const TARGET_ROOT: &str = "filestate";

#[doc(hidden)]
pub use tracing as __tracing;
