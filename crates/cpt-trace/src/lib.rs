//! CPT Traceability Engine
//!
//! Derived names, reference resolution and completeness checking over a
//! validated [`cpt_store::RecordStore`].
//!
//! # Overview
//!
//! - **NameTable**: anchors and labels for every record, collisions fatal
//! - **Resolver**: lazily-built bidirectional reference index
//! - **CompletenessChecker**: every record under an obligation must be
//!   referenced or validly deferred
//! - **Diagnostics**: non-fatal problems collected across a run
//!
//! # Example
//!
//! ```rust,ignore
//! use cpt_trace::prelude::*;
//!
//! let mut diagnostics = Diagnostics::new();
//! let names = NameTable::build(&store, &mut diagnostics)?;
//! let resolver = Resolver::new(&store);
//! let violations = CompletenessChecker::new(&resolver).check_all(&[Obligation::default()]);
//! CompletenessChecker::report(&violations, &mut diagnostics);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod completeness;
pub mod constraint_id;
pub mod diagnostics;
pub mod index;
pub mod naming;

pub use completeness::{
    deferral_field, CompletenessChecker, Obligation, Violation, VIA_PROCESS_ASSUMPTIONS,
};
pub use constraint_id::{derive_identifier, ConstraintKind, ConstraintSpec, GroupCounters, Status, Tool};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use index::{relation_of, Edge, ReferenceIndex, Resolver};
pub use naming::{Anchor, NameTable, NamingError, Names};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for traceability operations
    pub use crate::{
        Anchor, CompletenessChecker, Diagnostic, Diagnostics, NameTable, NamingError, Obligation,
        Resolver, Severity, Violation,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
