use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::chat::{ChatState, Effect, Role, Tool, TurnId};
use crate::i18n::{self, Language};
use crate::render::render_turn;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool: Tool,
}

/// An absent language toggles between the two available ones.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LanguageRequest {
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// What the browser should do to its own widgets after this response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    pub scroll_to_bottom: bool,
    pub reset_input: bool,
}

impl Directives {
    pub fn absorb(&mut self, effect: &Effect) {
        match effect {
            Effect::ScrollToBottom => self.scroll_to_bottom = true,
            Effect::ResetInputHeight => self.reset_input = true,
            Effect::RequestCompletion { .. } | Effect::LogFailure(_) => {}
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct ToolView {
    pub tool: Tool,
    pub label: &'static str,
    pub active: bool,
}

/// Everything needed to draw the chat surface.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub accepted: bool,
    pub loading: bool,
    pub tool: Tool,
    pub tools: Vec<ToolView>,
    pub language: Language,
    pub draft: String,
    pub turns: Vec<TurnView>,
    pub directives: Directives,
    pub strings: BTreeMap<&'static str, &'static str>,
}

impl SessionView {
    pub fn new(session_id: Uuid, state: &ChatState) -> Self {
        let language = state.language();
        Self {
            session_id,
            accepted: false,
            loading: state.is_loading(),
            tool: state.tool(),
            tools: Tool::ALL
                .iter()
                .map(|tool| ToolView {
                    tool: *tool,
                    label: i18n::text(language, tool.label_key()),
                    active: *tool == state.tool(),
                })
                .collect(),
            language,
            draft: state.draft().to_string(),
            turns: state
                .transcript()
                .turns()
                .iter()
                .map(|turn| TurnView {
                    id: turn.id(),
                    role: turn.role(),
                    content: turn.content().to_string(),
                    html: render_turn(turn),
                })
                .collect(),
            directives: Directives::default(),
            strings: i18n::strings(language),
        }
    }

    pub fn accepted(mut self, accepted: bool) -> Self {
        self.accepted = accepted;
        self
    }

    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }
}
