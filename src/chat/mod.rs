//! Conversation state and the rules that move it between idle and submitting.
//!
//! Nothing in here performs I/O. The web layer feeds [`Event`]s into
//! [`transition`] and carries out the returned [`Effect`]s.

mod controller;
mod tool;
mod transcript;
mod turn;

pub use controller::{transition, ChatState, Effect, Event, Transition};
pub use tool::Tool;
#[cfg(test)]
pub use transcript::Transcript;
pub use turn::{Role, Turn, TurnId};
