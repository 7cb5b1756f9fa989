use super::tool::Tool;
use super::transcript::Transcript;
use super::turn::{Role, Turn};
use crate::i18n::{self, Key, Language};
use crate::model::GatewayError;

/// Everything the chat surface knows about one conversation.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    transcript: Transcript,
    draft: String,
    loading: bool,
    tool: Tool,
    language: Language,
    // Bumped by every reset; replies tagged with an older epoch are dropped.
    epoch: u64,
}

impl ChatState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn can_submit(&self) -> bool {
        !self.loading && !self.draft.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// The input box content changed.
    DraftChanged(String),
    Submit,
    CompletionResolved {
        epoch: u64,
        result: Result<String, GatewayError>,
    },
    NewChat,
    SelectTool(Tool),
    SelectLanguage(Language),
    ToggleLanguage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the completion gateway with this transcript snapshot and feed the
    /// outcome back as [`Event::CompletionResolved`] with the same epoch.
    RequestCompletion { epoch: u64, transcript: Vec<Turn> },
    ScrollToBottom,
    ResetInputHeight,
    LogFailure(GatewayError),
}

#[derive(Debug)]
pub struct Transition {
    pub state: ChatState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: ChatState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

pub fn transition(mut state: ChatState, event: Event) -> Transition {
    match event {
        Event::DraftChanged(text) => {
            state.draft = text;
            Transition::unchanged(state)
        }
        Event::Submit => {
            if !state.can_submit() {
                return Transition::unchanged(state);
            }
            let content = state.draft.trim().to_string();
            state.transcript.append(Role::User, content);
            state.draft.clear();
            state.loading = true;
            let effects = vec![
                Effect::ScrollToBottom,
                Effect::ResetInputHeight,
                Effect::RequestCompletion {
                    epoch: state.epoch,
                    transcript: state.transcript.turns().to_vec(),
                },
            ];
            Transition { state, effects }
        }
        Event::CompletionResolved { epoch, result } => {
            if !state.loading {
                return Transition::unchanged(state);
            }
            state.loading = false;

            let mut effects = Vec::new();
            let reply = match result {
                Ok(text) => text,
                Err(error) => {
                    effects.push(Effect::LogFailure(error));
                    i18n::text(state.language, Key::ApiError).to_string()
                }
            };
            if epoch == state.epoch {
                state.transcript.append(Role::Assistant, reply);
                effects.push(Effect::ScrollToBottom);
            }
            Transition { state, effects }
        }
        Event::NewChat => {
            state.transcript.clear();
            state.draft.clear();
            state.epoch += 1;
            Transition {
                state,
                effects: vec![Effect::ResetInputHeight],
            }
        }
        Event::SelectTool(tool) => {
            state.tool = tool;
            Transition::unchanged(state)
        }
        Event::SelectLanguage(language) => {
            state.language = language;
            Transition::unchanged(state)
        }
        Event::ToggleLanguage => {
            state.language = state.language.toggled();
            Transition::unchanged(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn apply(state: ChatState, event: Event) -> (ChatState, Vec<Effect>) {
        let Transition { state, effects } = transition(state, event);
        (state, effects)
    }

    fn submit(state: ChatState, text: &str) -> (ChatState, Vec<Effect>) {
        let (state, _) = apply(state, Event::DraftChanged(text.to_string()));
        apply(state, Event::Submit)
    }

    fn requested(effects: &[Effect]) -> Option<(u64, Vec<(Role, String)>)> {
        effects.iter().find_map(|effect| match effect {
            Effect::RequestCompletion { epoch, transcript } => Some((
                *epoch,
                transcript
                    .iter()
                    .map(|turn| (turn.role(), turn.content().to_string()))
                    .collect(),
            )),
            _ => None,
        })
    }

    fn resolve(state: ChatState, effects: &[Effect], result: Result<String, GatewayError>) -> ChatState {
        let (epoch, _) = requested(effects).expect("a completion request");
        apply(state, Event::CompletionResolved { epoch, result }).0
    }

    fn pairs(state: &ChatState) -> Vec<(Role, String)> {
        state
            .transcript()
            .turns()
            .iter()
            .map(|turn| (turn.role(), turn.content().to_string()))
            .collect()
    }

    #[test]
    fn submit_appends_trimmed_user_turn_and_starts_loading() {
        let (state, effects) = submit(ChatState::default(), "  hi there \n");

        assert_eq!(pairs(&state), vec![(Role::User, "hi there".to_string())]);
        assert_eq!(state.draft(), "");
        assert!(state.is_loading());
        assert!(effects.contains(&Effect::ScrollToBottom));
        assert!(effects.contains(&Effect::ResetInputHeight));
        assert_eq!(
            requested(&effects).map(|(_, sent)| sent),
            Some(vec![(Role::User, "hi there".to_string())])
        );
    }

    #[test]
    fn blank_draft_is_inert() {
        for draft in ["", "   ", "\n\t  \n"] {
            let (state, effects) = submit(ChatState::default(), draft);
            assert!(state.transcript().is_empty());
            assert!(!state.is_loading());
            assert!(effects.is_empty());
            assert_eq!(state.draft(), draft);
        }
    }

    #[test]
    fn submit_while_loading_is_inert() {
        let (state, _) = submit(ChatState::default(), "first");
        let (state, effects) = submit(state, "second");

        assert_eq!(state.transcript().len(), 1);
        assert!(state.is_loading());
        assert!(effects.is_empty());
        assert_eq!(state.draft(), "second");
    }

    #[test]
    fn success_appends_reply_verbatim() {
        let (state, effects) = submit(ChatState::default(), "hello");
        let state = resolve(state, &effects, Ok("Hello!".to_string()));

        assert_eq!(
            pairs(&state),
            vec![
                (Role::User, "hello".to_string()),
                (Role::Assistant, "Hello!".to_string()),
            ]
        );
        assert!(!state.is_loading());
    }

    #[test]
    fn every_failure_becomes_the_localized_error_turn() {
        let failures = [
            GatewayError::MissingCredential,
            GatewayError::Network("connection refused".to_string()),
            GatewayError::Upstream("Incorrect API key provided".to_string()),
            GatewayError::MalformedResponse("missing choices".to_string()),
        ];
        for language in Language::ALL {
            for failure in failures.clone() {
                let (state, effects) = submit(ChatState::new(language), "hello");
                let (epoch, _) = requested(&effects).unwrap();
                let (state, effects) = apply(
                    state,
                    Event::CompletionResolved {
                        epoch,
                        result: Err(failure.clone()),
                    },
                );

                let last = state.transcript().last().unwrap();
                assert_eq!(last.role(), Role::Assistant);
                assert_eq!(last.content(), i18n::text(language, Key::ApiError));
                assert!(!state.is_loading());
                assert!(effects.contains(&Effect::LogFailure(failure)));
                assert_eq!(state.draft(), "");
            }
        }
    }

    #[test]
    fn error_text_follows_language_active_at_resolution() {
        let (state, effects) = submit(ChatState::new(Language::En), "hello");
        let (state, _) = apply(state, Event::ToggleLanguage);
        let state = resolve(state, &effects, Err(GatewayError::MissingCredential));

        assert_eq!(
            state.transcript().last().unwrap().content(),
            i18n::text(Language::Es, Key::ApiError)
        );
    }

    #[test]
    fn each_request_carries_the_full_history_in_order() {
        let mut state = ChatState::default();
        for (n, (question, answer)) in [("one", "uno"), ("two", "dos"), ("three", "tres")]
            .into_iter()
            .enumerate()
        {
            let before = pairs(&state);
            let (next, effects) = submit(state, question);
            let (_, sent) = requested(&effects).unwrap();

            let mut expected = before;
            expected.push((Role::User, question.to_string()));
            assert_eq!(sent, expected);
            assert_eq!(sent.len(), n * 2 + 1);

            state = resolve(next, &effects, Ok(answer.to_string()));
        }

        let roles: Vec<_> = state.transcript().turns().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
            ]
        );
    }

    #[test]
    fn new_chat_empties_transcript_and_draft() {
        let (state, effects) = submit(ChatState::default(), "hello");
        let state = resolve(state, &effects, Ok("hi".to_string()));
        let (state, _) = apply(state, Event::DraftChanged("half typed".to_string()));

        let (state, effects) = apply(state, Event::NewChat);
        assert!(state.transcript().is_empty());
        assert_eq!(state.draft(), "");
        assert_eq!(effects, vec![Effect::ResetInputHeight]);

        let (state, _) = apply(state, Event::NewChat);
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn reply_to_a_reset_conversation_is_dropped() {
        let (state, effects) = submit(ChatState::default(), "hello");
        let (state, _) = apply(state, Event::NewChat);
        assert!(state.is_loading());

        let (state, _) = submit(state, "blocked while the old call runs");
        assert!(state.transcript().is_empty());

        let state = resolve(state, &effects, Ok("late reply".to_string()));
        assert!(state.transcript().is_empty());
        assert!(!state.is_loading());

        let (state, effects) = submit(state, "fresh start");
        assert_eq!(
            requested(&effects).map(|(_, sent)| sent),
            Some(vec![(Role::User, "fresh start".to_string())])
        );
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn resolution_without_pending_request_is_ignored() {
        let (state, effects) = apply(
            ChatState::default(),
            Event::CompletionResolved {
                epoch: 0,
                result: Ok("stray".to_string()),
            },
        );
        assert!(state.transcript().is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn switching_tool_touches_nothing_else() {
        let (state, _) = submit(ChatState::default(), "hello");
        let (state, _) = apply(state, Event::DraftChanged("draft".to_string()));
        let before = pairs(&state);

        for tool in Tool::ALL {
            let (next, effects) = apply(state.clone(), Event::SelectTool(tool));
            assert_eq!(next.tool(), tool);
            assert_eq!(pairs(&next), before);
            assert_eq!(next.draft(), "draft");
            assert!(next.is_loading());
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn language_toggle_is_reversible() {
        let state = ChatState::new(Language::En);
        let (state, _) = apply(state, Event::ToggleLanguage);
        assert_eq!(state.language(), Language::Es);
        let (state, _) = apply(state, Event::ToggleLanguage);
        assert_eq!(state.language(), Language::En);
        let (state, _) = apply(state, Event::SelectLanguage(Language::Es));
        assert_eq!(state.language(), Language::Es);
    }
}
