//! Line-level diff of text assets, with unchanged context windowed down.
//!
//! Uses the `similar` crate (Myers diff algorithm) to split two texts into
//! runs of equal, inserted, and deleted lines. Unchanged runs are trimmed to
//! at most [`CONTEXT_LINES`] lines next to each change, so that a one-line
//! edit in a large payload renders as a handful of rows.

use similar::{ChangeTag, TextDiff};

use plandiff_types::StepOp;

use crate::config::RenderOptions;
use crate::renderer::Renderer;

/// Unchanged lines kept on each side of a change.
pub const CONTEXT_LINES: usize = 2;

/// What happened to a run of lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunTag {
    Equal,
    Inserted,
    Deleted,
}

/// Consecutive lines that share a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRun {
    pub tag: RunTag,
    /// Lines without their terminators.
    pub lines: Vec<String>,
}

/// Compute the ordered line runs that turn `old` into `new`.
pub fn diff_lines(old: &str, new: &str) -> Vec<LineRun> {
    let text_diff = TextDiff::from_lines(old, new);
    let mut runs: Vec<LineRun> = Vec::new();

    for change in text_diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => RunTag::Equal,
            ChangeTag::Insert => RunTag::Inserted,
            ChangeTag::Delete => RunTag::Deleted,
        };
        let line = change.value().trim_end_matches(['\n', '\r']).to_string();

        match runs.last_mut() {
            Some(run) if run.tag == tag => run.lines.push(line),
            _ => runs.push(LineRun {
                tag,
                lines: vec![line],
            }),
        }
    }

    runs
}

/// Render the diff between two texts at `level`.
pub fn render_text_diff(old: &str, new: &str, level: usize) -> String {
    let opts = RenderOptions::default();
    let mut r = Renderer::new(&opts);
    r.print_text_diff(&diff_lines(old, new), level);
    r.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunPosition {
    First,
    Interior,
    Last,
}

/// The rows shown for an unchanged run; `None` stands for elided lines.
fn visible_context<'a>(lines: &[&'a str], position: RunPosition) -> Vec<Option<&'a str>> {
    let n = lines.len();
    let c = CONTEXT_LINES;
    let mut rows = Vec::with_capacity(n.min(2 * c + 1));

    match position {
        RunPosition::First if n > c + 1 => {
            rows.push(None);
            rows.extend(lines[n - c..].iter().copied().map(Some));
        }
        RunPosition::Last if n > c + 1 => {
            rows.extend(lines[..c].iter().copied().map(Some));
            rows.push(None);
        }
        RunPosition::Interior if n > 2 * c + 1 => {
            rows.extend(lines[..c].iter().copied().map(Some));
            rows.push(None);
            rows.extend(lines[n - c..].iter().copied().map(Some));
        }
        _ => rows.extend(lines.iter().copied().map(Some)),
    }

    rows
}

impl Renderer<'_> {
    pub(crate) fn print_text_diff(&mut self, runs: &[LineRun], level: usize) {
        let last = runs.len().saturating_sub(1);

        for (index, run) in runs.iter().enumerate() {
            // Blank lines carry no information in a preview.
            let lines: Vec<&str> = run
                .lines
                .iter()
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .collect();

            match run.tag {
                RunTag::Inserted => {
                    for line in lines {
                        self.print_text_line(StepOp::Create, line, level);
                    }
                }
                RunTag::Deleted => {
                    for line in lines {
                        self.print_text_line(StepOp::Delete, line, level);
                    }
                }
                RunTag::Equal => {
                    let position = if index == 0 {
                        RunPosition::First
                    } else if index == last {
                        RunPosition::Last
                    } else {
                        RunPosition::Interior
                    };
                    for row in visible_context(&lines, position) {
                        match row {
                            Some(line) => self.print_text_line(StepOp::Same, line, level),
                            None => self.out.write_with_indent(level, StepOp::Same, false, "...\n"),
                        }
                    }
                }
            }
        }
    }

    fn print_text_line(&mut self, op: StepOp, line: &str, level: usize) {
        let prefix = matches!(op, StepOp::Create | StepOp::Delete);
        self.out.write_with_indent(level, op, prefix, line);
        self.out.write_raw("\n");
    }
}
