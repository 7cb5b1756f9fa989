//! User-visible strings, keyed by language.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    #[cfg(test)]
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Title,
    Greeting,
    Placeholder,
    Send,
    NewChat,
    Thinking,
    ApiError,
    SwitchLanguage,
    ToolChat,
    ToolEditor,
    ToolChart,
}

impl Key {
    pub const ALL: [Key; 11] = [
        Key::Title,
        Key::Greeting,
        Key::Placeholder,
        Key::Send,
        Key::NewChat,
        Key::Thinking,
        Key::ApiError,
        Key::SwitchLanguage,
        Key::ToolChat,
        Key::ToolEditor,
        Key::ToolChart,
    ];

    /// Name used in templates and in the `data-i18n` attributes of the page.
    pub fn name(&self) -> &'static str {
        match self {
            Key::Title => "title",
            Key::Greeting => "greeting",
            Key::Placeholder => "placeholder",
            Key::Send => "send",
            Key::NewChat => "new_chat",
            Key::Thinking => "thinking",
            Key::ApiError => "api_error",
            Key::SwitchLanguage => "switch_language",
            Key::ToolChat => "tool_chat",
            Key::ToolEditor => "tool_editor",
            Key::ToolChart => "tool_chart",
        }
    }
}

pub fn text(language: Language, key: Key) -> &'static str {
    match language {
        Language::En => english(key),
        Language::Es => spanish(key),
    }
}

/// The whole table for one language.
pub fn strings(language: Language) -> BTreeMap<&'static str, &'static str> {
    Key::ALL
        .iter()
        .map(|key| (key.name(), text(language, *key)))
        .collect()
}

fn english(key: Key) -> &'static str {
    match key {
        Key::Title => "AI Chat",
        Key::Greeting => "How can I help you today?",
        Key::Placeholder => "Type a message. Shift+Enter for a new line.",
        Key::Send => "Send",
        Key::NewChat => "New chat",
        Key::Thinking => "Thinking...",
        Key::ApiError => "Sorry, something went wrong while contacting the AI service. Please try again.",
        Key::SwitchLanguage => "Español",
        Key::ToolChat => "Chat",
        Key::ToolEditor => "Editor",
        Key::ToolChart => "Chart",
    }
}

fn spanish(key: Key) -> &'static str {
    match key {
        Key::Title => "Chat con IA",
        Key::Greeting => "¿En qué puedo ayudarte hoy?",
        Key::Placeholder => "Escribe un mensaje. Shift+Enter para una nueva línea.",
        Key::Send => "Enviar",
        Key::NewChat => "Nuevo chat",
        Key::Thinking => "Pensando...",
        Key::ApiError => "Lo sentimos, ocurrió un error al contactar el servicio de IA. Inténtalo de nuevo.",
        Key::SwitchLanguage => "English",
        Key::ToolChat => "Chat",
        Key::ToolEditor => "Editor",
        Key::ToolChart => "Gráfico",
    }
}
