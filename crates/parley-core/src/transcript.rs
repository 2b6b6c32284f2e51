//! The ordered conversation history.

use crate::turn::Turn;
use serde::{Deserialize, Serialize};

/// Append-only, chronologically ordered list of turns.
///
/// Insertion order is display order. Duplicate texts are kept as separate
/// turns. The only way to remove turns is [`Transcript::clear`], which drops
/// all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn as_slice(&self) -> &[Turn] {
        &self.turns
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnId;

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user(TurnId(1), "again").unwrap());
        transcript.push(Turn::user(TurnId(2), "again").unwrap());

        assert_eq!(transcript.len(), 2);
        let ids: Vec<_> = transcript.iter().map(Turn::id).collect();
        assert_eq!(ids, vec![TurnId(1), TurnId(2)]);
        assert_eq!(transcript.last().unwrap().id(), TurnId(2));
    }

    #[test]
    fn test_clear_empties_transcript() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user(TurnId(1), "hi").unwrap());
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
