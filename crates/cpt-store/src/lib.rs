//! CPT Record Store
//!
//! The trusted boundary between record files and the traceability engine.
//! Files are decoded by a [`RecordParser`], validated once against the fixed
//! category schema, and exposed as an immutable [`RecordStore`].
//!
//! # Architecture
//!
//! ```text
//! record files → ParserRegistry → RawRecord → RecordStoreBuilder → RecordStore
//!                                                  ↑
//!                                           schema (static)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cpt_store::{Category, RecordStore};
//!
//! let store = RecordStore::load(&["records/steps.yaml", "records/assumptions.yaml"])?;
//! for step in store.iterate(Category::ProcessStep) {
//!     println!("{} declared at {}", step.name, step.location);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builder;
pub mod error;
pub mod parsers;
pub mod raw;
pub mod record;
pub mod schema;
pub mod store;

pub use builder::RecordStoreBuilder;
pub use error::{FieldError, ParseError, SchemaViolation, StoreError};
pub use parsers::{default_parsers, JsonParser, ParserRegistry, RecordParser, YamlParser};
pub use raw::{RawRecord, RawValue};
pub use record::{EnumLiteral, FieldValue, Location, Record, RecordId};
pub use schema::{Category, CategorySchema, Enumeration, FieldSpec, FieldType, RelationKind};
pub use store::RecordStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the record store
    pub use crate::builder::RecordStoreBuilder;
    pub use crate::error::{FieldError, StoreError};
    pub use crate::raw::{RawRecord, RawValue};
    pub use crate::record::{FieldValue, Location, Record, RecordId};
    pub use crate::schema::{Category, RelationKind};
    pub use crate::store::RecordStore;
}
