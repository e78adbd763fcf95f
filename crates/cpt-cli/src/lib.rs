//! CPT Command Line
//!
//! Ties the record store, the traceability engine and the renderers into
//! one run per invocation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │  files   │──▶│ RecordStore│──▶│ NameTable  │──▶│ Renderer │──▶ stdout / files
//! │ + config │   │ (validated)│   │ Resolver   │   │ (dialect)│
//! └──────────┘   └────────────┘   │ Completeness│  └──────────┘
//!                                 └────────────┘
//! ```
//!
//! A fatal error (unreadable file, schema violation, duplicate anchor) ends
//! the run before anything is written. Local errors and completeness
//! warnings are collected and turn the exit status to failure once every
//! output has been written.
//!
//! # Example
//!
//! ```rust,ignore
//! use cpt_cli::run::{run, Invocation};
//!
//! let outcome = run(&Invocation::new(vec!["handbook.yaml".into()]))?;
//! for diagnostic in outcome.diagnostics.iter() {
//!     eprintln!("{diagnostic}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod config;
pub mod output;
pub mod run;

pub use config::{ConfigError, HandbookConfig};
pub use output::{Destination, Output, Target};
pub use run::{run, Invocation, Outcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
