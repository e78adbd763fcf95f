//! CPT Document Renderer
//!
//! Walks a validated store with its [`cpt_trace::NameTable`] and
//! [`cpt_trace::Resolver`] and produces handbook fragments.
//!
//! # Architecture
//!
//! ```text
//! RecordStore + NameTable + Resolver
//!         │
//!         ▼
//!     Renderer ──(BodyText)──► Fragment ──(Dialect)──► text
//!                                              ├─ Rst
//!                                              └─ Markdown
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cpt_render::prelude::*;
//!
//! let renderer = Renderer::new(&names, &resolver, &RenderConfig::default());
//! let filter = RenderFilter::new().with_min_priority(Priority::Medium);
//! for artifact in renderer.render(Document::Checklist, &filter, &Rst, &mut diagnostics) {
//!     std::fs::write("checklist.rst", artifact.content)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod body;
pub mod config;
pub mod dialect;
pub mod documents;
pub mod filter;
pub mod markup;

pub use body::{BodyText, Linker};
pub use config::{RenderConfig, RoleTemplate};
pub use dialect::{Dialect, Format, Markdown, Rst};
pub use documents::{Artifact, ArtifactKind, Document, Renderer, NOT_TRACED, PROCESS_ASSUMPTIONS};
pub use filter::{Priority, RenderFilter};
pub use markup::{Block, Fragment, Inline, LinkTarget, Span};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for rendering
    pub use crate::{
        Artifact, ArtifactKind, Dialect, Document, Format, Markdown, Priority, RenderConfig,
        RenderFilter, Renderer, Rst,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
