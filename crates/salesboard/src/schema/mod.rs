//! Canonical schema: field descriptors, the registry and canonical tables.

pub mod columns;
mod field;
mod registry;
mod table;
mod types;

pub use field::FieldDescriptor;
pub use registry::SchemaRegistry;
pub use table::CanonicalTable;
pub use types::SemanticType;
