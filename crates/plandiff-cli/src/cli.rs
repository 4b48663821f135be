use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plandiff",
    about = "Render resource change previews as colorized property diffs",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log render decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the steps in a JSON document
    Render(RenderArgs),
    /// List step operations and their glyphs
    Ops,
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON document holding one step or a `steps` list
    pub file: PathBuf,
    /// Show unresolved values as typed placeholders
    #[arg(long)]
    pub planning: bool,
    /// Hide unchanged rows
    #[arg(long)]
    pub summary: bool,
    /// Show serialized program code instead of eliding it
    #[arg(long)]
    pub debug: bool,
    /// Strip color instead of emitting terminal styles
    #[arg(long)]
    pub no_color: bool,
    /// TOML file with render options
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Indent levels added before every step
    #[arg(long, default_value_t = 0)]
    pub indent: usize,
}
