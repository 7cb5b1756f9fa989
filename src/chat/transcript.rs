use super::turn::{Role, Turn, TurnId};

/// Ordered, append-only list of turns. The only bulk operation is [`clear`].
///
/// [`clear`]: Transcript::clear
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> TurnId {
        let id = TurnId::new(self.next_id);
        self.next_id += 1;
        self.turns.push(Turn::new(id, role, content.into()));
        id
    }

    /// Drops every turn. The id counter keeps running so ids stay unique
    /// for the lifetime of the session.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
