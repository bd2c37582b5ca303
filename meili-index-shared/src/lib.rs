//! # Meili Index Shared
//!
//! Declaration types shared by the repository and module crates.
//!
//! A model type describes its search index once, through a
//! [`DeclarationBuilder`], and the result is frozen into an immutable
//! [`ModelDeclaration`]. Nothing in this crate performs I/O; the
//! declarations are only read later, when the index settings are
//! reconciled with the remote service.

pub mod declaration;
pub mod errors;
pub mod field_set;
pub mod registry;

pub use declaration::{
    is_valid_index_uid, DeclarationBuilder, FieldAttribute, ModelDeclaration, ModelId,
    MAX_INDEX_UID_LEN,
};
pub use errors::DeclarationError;
pub use field_set::FieldSet;
pub use registry::{ModelRegistry, SearchModel};
