//! Rendering core for plandiff.
//!
//! Turns resource steps and their property diffs into indented, glyph-prefixed
//! text for change previews. Output is plain text interleaved with color
//! markers (see [`plandiff_types::colors`]); resolving or stripping the
//! markers is left to the caller.
//!
//! # Key Types
//!
//! - [`RenderOptions`] -- planning, summary, and debug modes plus the depth limit
//! - [`Printer`] -- the output sink every entry point writes through
//! - [`LineRun`] / [`RunTag`] -- line-level diff of text assets
//! - [`Merged`] -- one step of the name-ordered merge of archive entries
//!
//! # Entry Points
//!
//! - [`render_step`] -- summary, details, and outputs of one step
//! - [`render_object_diff`] -- a property diff at indent level 1
//! - [`render_value`] / [`render_object`] -- values with no diff context

pub mod blob;
pub mod config;
pub mod error;
pub mod printer;
mod renderer;
pub mod step;
pub mod text;
pub mod tree;
pub mod value;

pub use blob::{merge_by_name, Merged};
pub use config::{RenderOptions, DEFAULT_MAX_DEPTH};
pub use error::{RenderError, RenderResult};
pub use printer::{format_number, indent_string, short_hash, text_change, Printer, INDENT_WIDTH};
pub use step::{
    parent_depth, render_step, resource_outputs, resource_properties_details,
    resource_properties_summary, step_header,
};
pub use text::{diff_lines, render_text_diff, LineRun, RunTag, CONTEXT_LINES};
pub use tree::render_object_diff;
pub use value::{render_object, render_value, should_print};
