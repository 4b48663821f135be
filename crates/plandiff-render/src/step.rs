//! Rendering of a whole resource step.
//!
//! A step renders in three parts: a summary (glyph, type, op, id, URN), the
//! property details (full inputs for creations and deletions, an object diff
//! for updates), and the output properties that differ from the inputs.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use plandiff_types::{colors, ObjectDiff, PropertyKey, StepMetadata, StepOp, Urn};

use crate::config::RenderOptions;
use crate::error::RenderResult;
use crate::printer::{indent_string, max_key, Printer, Title};
use crate::renderer::Renderer;
use crate::value::should_print;

/// Count how many already-rendered ancestors `step` has.
///
/// Walking stops silently at the first parent that has not been rendered
/// yet, which happens when children are deleted before their parents; the
/// depth counted so far is returned.
pub fn parent_depth(step: &StepMetadata, rendered: &BTreeMap<Urn, StepMetadata>) -> usize {
    let mut depth = 0;
    let mut parent = step.parent();

    while let Some(urn) = parent {
        let Some(ancestor) = rendered.get(urn) else {
            debug!(urn = %step.urn, missing = %urn, depth, "parent not rendered yet");
            break;
        };
        depth += 1;
        if depth > rendered.len() {
            debug!(urn = %step.urn, "parent chain loops");
            break;
        }
        parent = ancestor.parent();
    }

    depth
}

/// `<type>: (<op>)`, followed by a lock when the resource is protected.
pub fn step_header(step: &StepMetadata) -> String {
    let old_protect = step.old.as_ref().is_some_and(|s| s.protect);
    let new_protect = step.new.as_ref().is_some_and(|s| s.protect);

    let lock = if step.new.is_some() && !new_protect && old_protect {
        " 🔓"
    } else if new_protect || old_protect {
        " 🔒"
    } else {
        ""
    };
    format!("{}: ({}){lock}\n", step.type_token, step.op)
}

/// The step's glyph and header, then its id and URN as pseudo-properties.
pub fn resource_properties_summary(step: &StepMetadata, level: usize) -> String {
    let op = step.op;
    let mut out = Printer::new();

    out.write_raw(&indent_string(level, op, false));
    out.write_raw(&op.prefix());
    out.write_raw(&step_header(step));
    out.write_raw(colors::RESET);

    // The id and URN never change under an update, so they read as unchanged.
    let pseudo_op = op.same_unless_create_or_delete();
    if let Some(id) = step.old.as_ref().and_then(|s| s.id.as_deref()) {
        out.write_with_indent(level + 1, pseudo_op, false, &format!("[id={id}]\n"));
    }
    out.write_with_indent(level + 1, pseudo_op, false, &format!("[urn={}]\n", step.urn));

    out.into_string()
}

/// The step's input properties, or their diff for updates, one level below
/// `level`.
///
/// `diff` is the structural diff of the old and new inputs, computed by the
/// caller. When an update carries no diff, the new inputs are listed whole.
pub fn resource_properties_details(
    step: &StepMetadata,
    diff: Option<&ObjectDiff>,
    level: usize,
    opts: &RenderOptions,
) -> RenderResult<String> {
    let level = level + 1;
    let mut r = Renderer::new(opts);

    let replaces: BTreeSet<PropertyKey> = match step.op {
        StepOp::Replace | StepOp::CreateReplacement => step.keys.iter().cloned().collect(),
        _ => BTreeSet::new(),
    };

    match (&step.old, &step.new) {
        (None, Some(new)) => r.print_object(&new.inputs, level, step.op, false)?,
        // The summary already names what is going away.
        (Some(old), None) => {
            if !opts.summary {
                r.print_object(&old.inputs, level, step.op, false)?;
            }
        }
        (Some(_), Some(new)) => match diff {
            Some(diff) => r.print_object_diff(diff, &replaces, false, level)?,
            None => r.print_object(&new.inputs, level, step.op, true)?,
        },
        (None, None) => {}
    }

    Ok(r.finish())
}

/// Output properties that are new or differ from the same-named input.
pub fn resource_outputs(
    step: &StepMetadata,
    level: usize,
    opts: &RenderOptions,
) -> RenderResult<String> {
    let Some(new) = &step.new else {
        return Ok(String::new());
    };
    let Some(outputs) = &new.outputs else {
        return Ok(String::new());
    };

    let op = step.op.same_unless_create_or_delete();
    let align = max_key(outputs.keys().map(|k| k.as_str()));
    let mut r = Renderer::new(opts);
    let mut first = true;

    for (key, output) in outputs {
        if !should_print(output, true) {
            continue;
        }
        let changed = new.inputs.get(key) != Some(output);
        if !changed {
            continue;
        }
        if first {
            r.out.write_with_indent(level, op, false, "---outputs:---\n");
            first = false;
        }
        Title::key(key.as_str(), align, level).print(&mut r.out, op, false);
        r.print_value(output, level, op, false)?;
    }

    Ok(r.finish())
}

/// Summary, details, and outputs for one step, indented `indent` levels plus
/// one per rendered ancestor.
///
/// Rendered steps are recorded in `rendered` so that later children find
/// their parents.
pub fn render_step(
    step: &StepMetadata,
    diff: Option<&ObjectDiff>,
    indent: usize,
    rendered: &mut BTreeMap<Urn, StepMetadata>,
    opts: &RenderOptions,
) -> RenderResult<String> {
    let level = indent + parent_depth(step, rendered);
    debug!(urn = %step.urn, op = %step.op, level, "rendering step");

    let mut text = resource_properties_summary(step, level);
    text.push_str(&resource_properties_details(step, diff, level, opts)?);
    text.push_str(&resource_outputs(step, level + 1, opts)?);

    rendered.insert(step.urn.clone(), step.clone());
    Ok(text)
}
