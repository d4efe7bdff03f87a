//! Decoded ASTERIX record abstraction.
//!
//! A [`Record`] is a flat, already-decoded surveillance message: a category
//! plus a two-level mapping from data-item name to data-element name to
//! textual value. This crate has no notion of sensor types, tracks, or
//! geometry — it only models the record shape and the generic
//! mandatory/disjunctive field schema that categorizes whether a record
//! carries enough information to be interpreted further.

pub mod record;
pub mod schema;

pub use record::{DataElement, DataItem, Record};
pub use schema::{FieldSchema, SchemaViolation};
