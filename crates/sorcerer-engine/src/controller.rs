//! Application controller
//!
//! [`Editor`] is the only owner of the current [`EditorState`]. Input is turned
//! into a candidate state by the editing functions, offered to the trigger
//! engine, committed, and then written to storage.

use crate::editing::{
    CommandStatus, EditorCommand, EditorState, Key, KeyInput, apply_default_command,
    apply_triggers, handle_command, resolve_key, rich,
};
use crate::persistence::{
    CorruptSnapshotPolicy, Persistence, PersistenceError, SAVE_ACKNOWLEDGMENT, Storage,
};

/// Outcome of feeding one key press to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key changed the document or the caret
    Consumed,
    /// The key means nothing to the editor (front-end may use it)
    Ignored,
}

pub struct Editor<S: Storage> {
    state: EditorState,
    persistence: Persistence<S>,
}

impl<S: Storage> Editor<S> {
    /// Load the stored document (or start empty) and take ownership of the storage
    pub fn open(
        storage: S,
        key: impl Into<String>,
        policy: CorruptSnapshotPolicy,
    ) -> Result<Self, PersistenceError> {
        let mut persistence = Persistence::new(storage, key);
        let state = persistence.load_with_policy(policy)?;
        Ok(Self { state, persistence })
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Accept a candidate state, running it through the trigger engine first
    ///
    /// Returns whether a trigger consumed the candidate.
    pub fn on_change(&mut self, candidate: EditorState) -> Result<bool, PersistenceError> {
        let (next, triggered) = apply_triggers(&candidate);
        self.commit(next)?;
        Ok(triggered)
    }

    /// Replace the current state, then persist it
    fn commit(&mut self, next: EditorState) -> Result<(), PersistenceError> {
        self.state = next;
        self.persistence.save(self.state.content())
    }

    /// Type `text` at the caret
    pub fn type_text(&mut self, text: &str) -> Result<bool, PersistenceError> {
        let candidate = rich::insert_text(&self.state, text);
        self.on_change(candidate)
    }

    /// Feed one key press
    pub fn handle_key(&mut self, input: KeyInput) -> Result<KeyOutcome, PersistenceError> {
        if let Some(command) = resolve_key(&input) {
            let (candidate, status) = handle_command(command, &self.state);
            let candidate = match status {
                CommandStatus::Handled => candidate,
                CommandStatus::NotHandled => apply_default_command(command, &self.state),
            };
            log::trace!("command {command} ({status:?})");
            // History steps restore earlier states verbatim, shortcuts included
            if matches!(command, EditorCommand::Undo | EditorCommand::Redo) {
                self.commit(candidate)?;
            } else {
                self.on_change(candidate)?;
            }
            return Ok(KeyOutcome::Consumed);
        }

        match input.key {
            Key::Char(c) if !input.ctrl && !input.alt => {
                self.type_text(c.encode_utf8(&mut [0; 4]))?;
                Ok(KeyOutcome::Consumed)
            }
            Key::Tab => {
                self.type_text("\t")?;
                Ok(KeyOutcome::Consumed)
            }
            _ => Ok(KeyOutcome::Ignored),
        }
    }

    /// Explicit save; returns the acknowledgment to show the user
    pub fn save(&mut self) -> Result<&'static str, PersistenceError> {
        self.persistence.save(self.state.content())?;
        log::info!("explicit save under '{}'", self.persistence.key());
        Ok(SAVE_ACKNOWLEDGMENT)
    }
}
