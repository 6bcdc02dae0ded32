#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use crate::domain::models::Author;
use crate::domain::models::Turn;

const GREETING: &str = "Hello! I'm your AI Study Assistant. You can ask me to explain concepts, or upload a document and ask questions about it.";

/// The assistant session: an ordered, append-only sequence of turns plus a
/// flag marking an outstanding remote call. At most one assistant turn is
/// ever in progress; while it is, its text is the only thing that mutates.
pub struct Transcript {
    turns: Vec<Turn>,
    in_progress: bool,
}

fn seeded_turns() -> Vec<Turn> {
    return vec![Turn::new(Author::Assistant, GREETING)];
}

impl Default for Transcript {
    fn default() -> Transcript {
        return Transcript::seeded();
    }
}

impl Transcript {
    pub fn seeded() -> Transcript {
        return Transcript {
            turns: seeded_turns(),
            in_progress: false,
        };
    }

    /// Restores a persisted session. Loaded sessions are never mid-stream;
    /// an interrupted reply was either finished or discarded before save.
    pub fn from_turns(turns: Vec<Turn>) -> Transcript {
        if turns.is_empty() {
            return Transcript::seeded();
        }

        return Transcript {
            turns,
            in_progress: false,
        };
    }

    pub fn turns(&self) -> &[Turn] {
        return &self.turns;
    }

    pub fn in_progress(&self) -> bool {
        return self.in_progress;
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Appends the placeholder assistant turn and marks the session busy.
    /// Returns false without mutating when a reply is already in progress.
    pub fn begin_reply(&mut self) -> bool {
        if self.in_progress {
            return false;
        }

        self.turns.push(Turn::new(Author::Assistant, ""));
        self.in_progress = true;
        return true;
    }

    /// Replaces the in-progress turn's text wholesale. A no-op when no
    /// reply is in progress; correct sequencing never hits that path.
    pub fn replace_last(&mut self, content: &str) {
        if !self.in_progress {
            return;
        }

        if let Some(turn) = self.turns.last_mut() {
            turn.set_text(content);
        }
    }

    pub fn finish_reply(&mut self) {
        self.in_progress = false;
    }

    /// Error path: removes the placeholder turn so a failed call leaves no
    /// truncated reply behind.
    pub fn discard_pending(&mut self) {
        if !self.in_progress {
            return;
        }

        self.turns.pop();
        self.in_progress = false;
    }

    pub fn reset(&mut self) {
        self.turns = seeded_turns();
        self.in_progress = false;
    }
}
