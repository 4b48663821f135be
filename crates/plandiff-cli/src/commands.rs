use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Deserialize;
use tracing::debug;

use plandiff_render::{render_step, RenderOptions};
use plandiff_types::colors::{self, Color};
use plandiff_types::{ObjectDiff, StepMetadata, StepOp};

use crate::cli::{Cli, Command, RenderArgs};

/// A step together with the structural diff of its inputs.
#[derive(Debug, Deserialize)]
struct StepEntry {
    step: StepMetadata,
    #[serde(default)]
    diff: Option<ObjectDiff>,
}

#[derive(Debug, Deserialize)]
struct StepList {
    steps: Vec<StepEntry>,
}

/// Parse either a `{steps: [...]}` list or a single entry.
///
/// The shape is picked from the top-level keys first, so a malformed
/// document reports the field that failed.
fn parse_document(text: &str) -> serde_json::Result<Vec<StepEntry>> {
    let shape: serde_json::Value = serde_json::from_str(text)?;
    if shape.get("steps").is_some() {
        Ok(serde_json::from_str::<StepList>(text)?.steps)
    } else {
        Ok(vec![serde_json::from_str::<StepEntry>(text)?])
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Ops => cmd_ops(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = load_options(&args)?;
    let marked = render_file(&args.file, args.indent, &opts)?;
    if args.no_color {
        print!("{}", colors::strip(&marked));
    } else {
        print!("{}", colorize(&marked));
    }
    Ok(())
}

fn cmd_ops() -> anyhow::Result<()> {
    for op in StepOp::ALL {
        let glyph = paint(op.color(), &format!("[{}]", op.raw_prefix()));
        println!("{glyph} {}", op.as_str());
    }
    Ok(())
}

/// Options from the config file, with command-line flags layered on top.
fn load_options(args: &RenderArgs) -> anyhow::Result<RenderOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RenderOptions::default(),
    };
    opts.planning |= args.planning;
    opts.summary |= args.summary;
    opts.debug |= args.debug;
    Ok(opts)
}

/// Render every step in the document, in order, as marked-up text.
fn render_file(path: &Path, indent: usize, opts: &RenderOptions) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading step document {}", path.display()))?;
    let entries = parse_document(&text)
        .with_context(|| format!("parsing step document {}", path.display()))?;
    debug!(steps = entries.len(), ?opts, "rendering document");

    let mut rendered = BTreeMap::new();
    let mut out = String::new();
    for entry in &entries {
        let text = render_step(&entry.step, entry.diff.as_ref(), indent, &mut rendered, opts)
            .with_context(|| format!("rendering {}", entry.step.urn))?;
        out.push_str(&text);
    }
    Ok(out)
}

/// Replace color markers with terminal styles.
fn colorize(marked: &str) -> String {
    colors::spans(marked)
        .into_iter()
        .map(|span| match span.color {
            Some(color) => paint(color, span.text),
            None => span.text.to_string(),
        })
        .collect()
}

fn paint(color: Color, text: &str) -> String {
    let styled = match color {
        Color::Red => text.red(),
        Color::Green => text.green(),
        Color::Yellow => text.yellow(),
        Color::Magenta => text.magenta(),
        Color::BrightBlack => text.bright_black(),
        Color::BrightRed => text.bright_red(),
        Color::BrightGreen => text.bright_green(),
    };
    styled.to_string()
}
