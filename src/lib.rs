//! Inspect a relational database's catalog metadata and assemble it into a
//! normalized, language-neutral schema model: tables, columns, primary keys,
//! foreign keys, and indexes, with derived per-column flags and comments.
//!
//! The [`assemble::SchemaReader`] engine drives the pipeline over any
//! [`source::MetadataSource`]; [`pg::PgMetadataSource`] implements that
//! contract for PostgreSQL.

pub mod assemble;
pub mod error;
pub mod id;
pub mod model;
pub mod pg;
pub mod source;
#[cfg(test)]
pub(crate) mod testutil;
