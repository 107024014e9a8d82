//! Key bindings and key commands
//!
//! Front-ends translate their native key events into [`KeyInput`]. A key
//! resolves to at most one [`EditorCommand`]; printable characters resolve to
//! none and are typed as text instead.

use std::fmt;

use crate::editing::cursor::{self, Motion};
use crate::editing::rich;
use crate::editing::state::EditorState;

/// Keys the editor distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Escape,
}

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }
}

/// Named editor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    SplitBlock,
    Backspace,
    Delete,
    Undo,
    Redo,
    Move(Motion),
    Select(Motion),
}

impl EditorCommand {
    pub fn name(self) -> &'static str {
        match self {
            EditorCommand::SplitBlock => "split-block",
            EditorCommand::Backspace => "backspace",
            EditorCommand::Delete => "delete",
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
            EditorCommand::Move(Motion::Left) => "move-left",
            EditorCommand::Move(Motion::Right) => "move-right",
            EditorCommand::Move(Motion::Up) => "move-up",
            EditorCommand::Move(Motion::Down) => "move-down",
            EditorCommand::Move(Motion::LineStart) => "move-line-start",
            EditorCommand::Move(Motion::LineEnd) => "move-line-end",
            EditorCommand::Select(Motion::Left) => "select-left",
            EditorCommand::Select(Motion::Right) => "select-right",
            EditorCommand::Select(Motion::Up) => "select-up",
            EditorCommand::Select(Motion::Down) => "select-down",
            EditorCommand::Select(Motion::LineStart) => "select-line-start",
            EditorCommand::Select(Motion::LineEnd) => "select-line-end",
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a command handler consumed a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Handled,
    NotHandled,
}

/// Bindings shared by every front-end, Enter excluded
pub fn default_key_binding(input: &KeyInput) -> Option<EditorCommand> {
    let motion = match input.key {
        Key::Left => Some(Motion::Left),
        Key::Right => Some(Motion::Right),
        Key::Up => Some(Motion::Up),
        Key::Down => Some(Motion::Down),
        Key::Home => Some(Motion::LineStart),
        Key::End => Some(Motion::LineEnd),
        _ => None,
    };
    if let Some(motion) = motion {
        return Some(if input.shift {
            EditorCommand::Select(motion)
        } else {
            EditorCommand::Move(motion)
        });
    }

    match input.key {
        Key::Backspace => Some(EditorCommand::Backspace),
        Key::Delete => Some(EditorCommand::Delete),
        Key::Char('z') | Key::Char('Z') if input.ctrl && input.shift => Some(EditorCommand::Redo),
        Key::Char('z') if input.ctrl => Some(EditorCommand::Undo),
        Key::Char('y') if input.ctrl => Some(EditorCommand::Redo),
        _ => None,
    }
}

/// Resolve a key press to a command
///
/// Enter always becomes `split-block`, whatever modifiers are held.
pub fn resolve_key(input: &KeyInput) -> Option<EditorCommand> {
    if input.key == Key::Enter {
        return Some(EditorCommand::SplitBlock);
    }
    default_key_binding(input)
}

/// Handle the commands that override default behaviour
///
/// `split-block` splits the block at the caret and clears every active inline
/// style so the new block starts unstyled. Everything else is left to
/// [`apply_default_command`].
pub fn handle_command(command: EditorCommand, state: &EditorState) -> (EditorState, CommandStatus) {
    match command {
        EditorCommand::SplitBlock => {
            let split = rich::split_block(state);
            (rich::clear_inline_styles(&split), CommandStatus::Handled)
        }
        _ => (state.clone(), CommandStatus::NotHandled),
    }
}

/// Default behaviour for commands nobody handled
pub fn apply_default_command(command: EditorCommand, state: &EditorState) -> EditorState {
    match command {
        EditorCommand::SplitBlock => rich::split_block(state),
        EditorCommand::Backspace => rich::backspace(state),
        EditorCommand::Delete => rich::delete(state),
        EditorCommand::Undo => state.undo(),
        EditorCommand::Redo => state.redo(),
        EditorCommand::Move(motion) => cursor::move_caret(state, motion),
        EditorCommand::Select(motion) => cursor::extend_selection(state, motion),
    }
}
