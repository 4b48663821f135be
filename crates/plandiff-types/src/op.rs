use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::colors::Color;
use crate::error::TypeError;

/// The operation a step performs on a resource.
///
/// Every operation is bound to a display color and a glyph that is exactly
/// two characters wide, placed in the last two columns of a row's indentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOp {
    Same,
    Create,
    Update,
    Delete,
    Replace,
    CreateReplacement,
    DeleteReplaced,
}

impl StepOp {
    /// All operations, in display order.
    pub const ALL: [StepOp; 7] = [
        StepOp::Same,
        StepOp::Create,
        StepOp::Update,
        StepOp::Delete,
        StepOp::Replace,
        StepOp::CreateReplacement,
        StepOp::DeleteReplaced,
    ];

    pub const fn color(self) -> Color {
        match self {
            StepOp::Same => Color::BrightBlack,
            StepOp::Create => Color::Green,
            StepOp::Update => Color::Yellow,
            StepOp::Delete => Color::Red,
            StepOp::Replace => Color::Magenta,
            StepOp::CreateReplacement => Color::BrightGreen,
            StepOp::DeleteReplaced => Color::BrightRed,
        }
    }

    /// The uncolored two-character glyph.
    pub const fn raw_prefix(self) -> &'static str {
        match self {
            StepOp::Same => "  ",
            StepOp::Create => "+ ",
            StepOp::Update => "~ ",
            StepOp::Delete => "- ",
            StepOp::Replace => "+-",
            StepOp::CreateReplacement => "++",
            StepOp::DeleteReplaced => "--",
        }
    }

    /// The glyph preceded by the operation's color marker.
    pub fn prefix(self) -> String {
        format!("{}{}", self.color().marker(), self.raw_prefix())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StepOp::Same => "same",
            StepOp::Create => "create",
            StepOp::Update => "update",
            StepOp::Delete => "delete",
            StepOp::Replace => "replace",
            StepOp::CreateReplacement => "create-replacement",
            StepOp::DeleteReplaced => "delete-replaced",
        }
    }

    /// Collapse to [`StepOp::Same`] unless the step creates or deletes.
    ///
    /// Pseudo-properties such as the id and URN do not change under updates
    /// or replacements, so they are shown as unchanged.
    pub const fn same_unless_create_or_delete(self) -> StepOp {
        match self {
            StepOp::Create | StepOp::Delete | StepOp::DeleteReplaced => self,
            _ => StepOp::Same,
        }
    }
}

impl fmt::Display for StepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepOp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| TypeError::UnknownStepOp(s.to_string()))
    }
}
