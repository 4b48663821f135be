//! Foundation types for plandiff.
//!
//! This crate provides the property-tree model, the structural diff shapes
//! produced by an upstream differ, and the step operations that drive the
//! rendering core in `plandiff-render`.
//!
//! # Key Types
//!
//! - [`PropertyValue`] / [`PropertyMap`] -- Untyped, nested resource properties
//! - [`Asset`] / [`Archive`] -- Content-addressed blobs and blob containers
//! - [`ObjectDiff`] / [`ValueDiff`] / [`ArrayDiff`] -- Pre-computed structural diffs
//! - [`StepOp`] -- Operation tag bound to a color and a two-character glyph
//! - [`StepMetadata`] / [`ResourceState`] -- One resource step to render
//! - [`colors`] -- Color markers interleaved with rendered text

pub mod asset;
pub mod colors;
pub mod diff;
pub mod error;
pub mod op;
pub mod resource;
pub mod value;

pub use asset::{Archive, ArchiveEntry, ArchiveSource, Asset, AssetSource};
pub use colors::Color;
pub use diff::{ArrayDiff, ObjectDiff, ValueDiff};
pub use error::TypeError;
pub use op::StepOp;
pub use resource::{ResourceState, StepMetadata, Urn};
pub use value::{PropertyKey, PropertyMap, PropertyValue};
