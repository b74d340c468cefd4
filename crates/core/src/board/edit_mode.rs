use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Whether the board is displaying goals or editing one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum EditMode {
    #[default]
    Viewing,
    #[serde(rename_all = "camelCase")]
    Editing { goal_id: String },
}

impl EditMode {
    /// Enters editing for `goal_id`. Switching directly between goals is allowed.
    pub fn begin(&mut self, goal_id: impl Into<String>) {
        *self = EditMode::Editing {
            goal_id: goal_id.into(),
        };
    }

    /// The goal being edited, or a validation error when viewing.
    pub fn editing_goal(&self) -> Result<&str> {
        match self {
            EditMode::Editing { goal_id } => Ok(goal_id),
            EditMode::Viewing => Err(Error::invalid_input("No goal is being edited")),
        }
    }

    pub fn is_editing(&self, goal_id: &str) -> bool {
        matches!(self, EditMode::Editing { goal_id: id } if id == goal_id)
    }

    pub fn finish(&mut self) {
        *self = EditMode::Viewing;
    }
}
