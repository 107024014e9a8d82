use std::fmt;

use crate::models::{ContentState, Selection, StyleSet};

/// Kind of edit that produced a new content state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    BackspaceCharacter,
    DeleteCharacter,
    SplitBlock,
    ChangeBlockType,
    ChangeInlineStyle,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::InsertCharacters => "insert-characters",
            ChangeType::RemoveRange => "remove-range",
            ChangeType::BackspaceCharacter => "backspace-character",
            ChangeType::DeleteCharacter => "delete-character",
            ChangeType::SplitBlock => "split-block",
            ChangeType::ChangeBlockType => "change-block-type",
            ChangeType::ChangeInlineStyle => "change-inline-style",
        }
    }

    /// Change types that keep an explicitly set inline style override
    fn keeps_style_override(self) -> bool {
        matches!(self, ChangeType::ChangeBlockType | ChangeType::SplitBlock)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    content: ContentState,
    selection: Selection,
}

/// Immutable snapshot of the editor
///
/// Every transition returns a new `EditorState`; nothing is mutated in place.
/// Besides the content and selection it carries the inline style override
/// (styles the next typed characters receive when explicitly chosen) and the
/// undo/redo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    content: ContentState,
    selection: Selection,
    inline_style_override: Option<StyleSet>,
    last_change_type: Option<ChangeType>,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::empty()
    }
}

impl EditorState {
    /// Fresh document with a single empty block and the caret in it
    pub fn empty() -> Self {
        Self::with_content(ContentState::empty())
    }

    /// State for `content` with the caret at the start of the first block
    pub fn with_content(content: ContentState) -> Self {
        let selection = Selection::collapsed(content.first_block().key().clone(), 0);
        Self {
            content,
            selection,
            inline_style_override: None,
            last_change_type: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Same content with a different selection; clears the style override
    ///
    /// Also ends the current typing run, so text typed at the new caret gets
    /// its own undo step.
    pub fn with_selection(&self, selection: Selection) -> Self {
        let mut next = self.clone();
        next.selection = selection;
        next.inline_style_override = None;
        next.last_change_type = None;
        next
    }

    /// Same content and selection with an explicit style override
    pub fn with_inline_style_override(&self, style: StyleSet) -> Self {
        let mut next = self.clone();
        next.inline_style_override = Some(style);
        next
    }

    /// Record `content` as the result of an edit of kind `change_type`
    ///
    /// The selection is taken from the edit (`selection_after`). Consecutive
    /// character insertions share one undo step.
    pub fn push(
        &self,
        content: ContentState,
        selection_after: Selection,
        change_type: ChangeType,
    ) -> Self {
        let mut next = self.clone();

        let coalesce = change_type == ChangeType::InsertCharacters
            && self.last_change_type == Some(ChangeType::InsertCharacters)
            && !self.undo_stack.is_empty();
        if !coalesce {
            next.undo_stack.push(HistoryEntry {
                content: self.content.clone(),
                selection: self.selection.clone(),
            });
        }
        next.redo_stack.clear();

        next.content = content;
        next.selection = selection_after;
        next.last_change_type = Some(change_type);
        if !change_type.keeps_style_override() {
            next.inline_style_override = None;
        }
        next
    }

    /// Step back to the content before the last undo step
    pub fn undo(&self) -> Self {
        let mut next = self.clone();
        let Some(entry) = next.undo_stack.pop() else {
            return next;
        };
        next.redo_stack.push(HistoryEntry {
            content: self.content.clone(),
            selection: self.selection.clone(),
        });
        next.content = entry.content;
        next.selection = entry.selection;
        next.inline_style_override = None;
        next.last_change_type = None;
        next
    }

    pub fn redo(&self) -> Self {
        let mut next = self.clone();
        let Some(entry) = next.redo_stack.pop() else {
            return next;
        };
        next.undo_stack.push(HistoryEntry {
            content: self.content.clone(),
            selection: self.selection.clone(),
        });
        next.content = entry.content;
        next.selection = entry.selection;
        next.inline_style_override = None;
        next.last_change_type = None;
        next
    }

    /// Styles that the next typed character will carry
    ///
    /// An explicit override wins. Otherwise a collapsed caret takes the style of
    /// the character before it, falling back to the first character of the
    /// block and then to the last character of the nearest non-empty block
    /// above. A range takes the style of its first character.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }

        let start = self.selection.start();
        let Some(block) = self.content.block_for_key(&start.key) else {
            return StyleSet::new();
        };

        if !self.selection.is_collapsed() {
            return block.style_at(start.offset);
        }

        if start.offset > 0 {
            return block.style_at(start.offset - 1);
        }
        if !block.is_empty() {
            return block.style_at(0);
        }
        self.look_upward_for_style(block.key())
    }

    fn look_upward_for_style(&self, key: &crate::models::BlockKey) -> StyleSet {
        let Some(index) = self.content.block_index(key) else {
            return StyleSet::new();
        };
        self.content.blocks()[..index]
            .iter()
            .rev()
            .find(|b| !b.is_empty())
            .map(|b| b.style_at(b.len() - 1))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKey, ContentBlock, InlineStyle};
    use pretty_assertions::assert_eq;

    fn two_block_state() -> EditorState {
        let bold: StyleSet = [InlineStyle::Bold].into_iter().collect();
        let first = ContentBlock::from_text(BlockKey::from("a"), "Hi").apply_style(
            0,
            2,
            &InlineStyle::Bold,
            true,
        );
        let second = ContentBlock::with_key(BlockKey::from("b"));
        let state = EditorState::with_content(ContentState::from_blocks(vec![first, second]));
        assert_eq!(state.content().first_block().style_at(1), bold);
        state
    }

    #[test]
    fn test_empty_state() {
        let state = EditorState::empty();
        assert!(state.selection().is_collapsed());
        assert_eq!(state.selection().start_offset(), 0);
        assert!(state.current_inline_style().is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_current_style_looks_upward_from_empty_block() {
        let state = two_block_state()
            .with_selection(Selection::collapsed(BlockKey::from("b"), 0));
        assert!(state.current_inline_style().contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_override_wins_over_character_style() {
        let state = two_block_state()
            .with_selection(Selection::collapsed(BlockKey::from("a"), 2))
            .with_inline_style_override(StyleSet::new());
        assert!(state.current_inline_style().is_empty());
    }

    #[test]
    fn test_override_survives_only_some_changes() {
        let state = EditorState::empty().with_inline_style_override(
            [InlineStyle::Red].into_iter().collect(),
        );
        let selection = state.selection().clone();

        let after_type_change =
            state.push(state.content().clone(), selection.clone(), ChangeType::ChangeBlockType);
        assert!(after_type_change.inline_style_override().is_some());

        let after_removal =
            state.push(state.content().clone(), selection, ChangeType::RemoveRange);
        assert!(after_removal.inline_style_override().is_none());
    }

    #[test]
    fn test_undo_redo() {
        let state = EditorState::empty();
        let key = state.content().first_block().key().clone();
        let content = state
            .content()
            .replace_block(ContentBlock::from_text(key.clone(), "x"));
        let edited = state.push(
            content,
            Selection::collapsed(key, 1),
            ChangeType::InsertCharacters,
        );

        let undone = edited.undo();
        assert_eq!(undone.content().plain_text(), "");
        assert!(undone.can_redo());

        let redone = undone.redo();
        assert_eq!(redone.content().plain_text(), "x");
        assert_eq!(redone.selection().start_offset(), 1);
    }

    #[test]
    fn test_consecutive_insertions_share_undo_step() {
        let state = EditorState::empty();
        let key = state.content().first_block().key().clone();
        let mut current = state;
        for text in ["a", "ab", "abc"] {
            let content = current
                .content()
                .replace_block(ContentBlock::from_text(key.clone(), text));
            current = current.push(
                content,
                Selection::collapsed(key.clone(), text.len()),
                ChangeType::InsertCharacters,
            );
        }

        assert_eq!(current.undo().content().plain_text(), "");
    }

    #[test]
    fn test_moving_the_caret_starts_a_new_undo_step() {
        let state = EditorState::empty();
        let key = state.content().first_block().key().clone();
        let typed = |state: &EditorState, text: &str| {
            let content = state
                .content()
                .replace_block(ContentBlock::from_text(key.clone(), text));
            state.push(
                content,
                Selection::collapsed(key.clone(), text.len()),
                ChangeType::InsertCharacters,
            )
        };

        let state = typed(&state, "ab");
        let state = state.with_selection(Selection::collapsed(key.clone(), 0));
        assert_eq!(state.last_change_type(), None);

        let state = typed(&state, "xab");
        assert_eq!(state.undo().content().plain_text(), "ab");
    }
}
