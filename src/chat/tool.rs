use serde::{Deserialize, Serialize};

use crate::i18n::Key;

/// Mode selector shown next to the input. Has no bearing on completions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Chat,
    Editor,
    Chart,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Chat, Tool::Editor, Tool::Chart];

    pub fn label_key(&self) -> Key {
        match self {
            Tool::Chat => Key::ToolChat,
            Tool::Editor => Key::ToolEditor,
            Tool::Chart => Key::ToolChart,
        }
    }
}
