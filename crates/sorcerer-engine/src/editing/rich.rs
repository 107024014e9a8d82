//! Editor-state transitions for typing, deletion and formatting

use crate::editing::modifier;
use crate::editing::state::{ChangeType, EditorState};
use crate::models::{BlockType, InlineStyle, Position, Selection};

/// Type `text` over the selection using the current inline style
pub fn insert_text(state: &EditorState, text: &str) -> EditorState {
    let style = state.current_inline_style();
    let (content, caret) = modifier::replace_text(state.content(), state.selection(), text, &style);
    state.push(content, caret, ChangeType::InsertCharacters)
}

/// Remove the selection, or the character before the caret
///
/// At the start of a block the block is joined onto the previous one.
pub fn backspace(state: &EditorState) -> EditorState {
    let selection = state.selection();
    if !selection.is_collapsed() {
        return remove_selection(state);
    }

    let caret = selection.start();
    let target = if caret.offset > 0 {
        Position::new(caret.key.clone(), caret.offset - 1)
    } else {
        match state.content().block_before(&caret.key) {
            Some(previous) => Position::new(previous.key().clone(), previous.len()),
            None => return state.clone(),
        }
    };

    let range = Selection::range(target, caret.clone(), false);
    let (content, caret) = modifier::remove_range(state.content(), &range);
    state.push(content, caret, ChangeType::BackspaceCharacter)
}

/// Remove the selection, or the character after the caret
///
/// At the end of a block the next block is joined onto it.
pub fn delete(state: &EditorState) -> EditorState {
    let selection = state.selection();
    if !selection.is_collapsed() {
        return remove_selection(state);
    }

    let caret = selection.start();
    let Some(block) = state.content().block_for_key(&caret.key) else {
        return state.clone();
    };
    let target = if caret.offset < block.len() {
        Position::new(caret.key.clone(), caret.offset + 1)
    } else {
        match state.content().block_after(&caret.key) {
            Some(next) => Position::new(next.key().clone(), 0),
            None => return state.clone(),
        }
    };

    let range = Selection::range(caret.clone(), target, false);
    let (content, caret) = modifier::remove_range(state.content(), &range);
    state.push(content, caret, ChangeType::DeleteCharacter)
}

fn remove_selection(state: &EditorState) -> EditorState {
    let (content, caret) = modifier::remove_range(state.content(), state.selection());
    state.push(content, caret, ChangeType::RemoveRange)
}

/// Split the block at the caret, keeping whatever style the caret carries
pub fn split_block(state: &EditorState) -> EditorState {
    let (content, caret) = modifier::split_block(state.content(), state.selection());
    state.push(content, caret, ChangeType::SplitBlock)
}

/// Flip `style` on or off
///
/// With a caret the change only affects the style override used for the next
/// typed characters; with a range it is applied to the selected characters.
pub fn toggle_inline_style(state: &EditorState, style: &InlineStyle) -> EditorState {
    let current = state.current_inline_style();
    let enable = !current.contains(style);

    if state.selection().is_collapsed() {
        let mut next_style = current;
        if enable {
            next_style.insert(style.clone());
        } else {
            next_style.remove(style);
        }
        return state.with_inline_style_override(next_style);
    }

    let content =
        modifier::apply_inline_style(state.content(), state.selection(), style, enable);
    state.push(
        content,
        state.selection().clone(),
        ChangeType::ChangeInlineStyle,
    )
}

/// Toggle off every style active at the caret
pub fn clear_inline_styles(state: &EditorState) -> EditorState {
    state
        .current_inline_style()
        .iter()
        .fold(state.clone(), |acc, style| toggle_inline_style(&acc, style))
}

/// Give every block touched by the selection the type `block_type`
pub fn set_block_type(state: &EditorState, block_type: &BlockType) -> EditorState {
    let content = modifier::set_block_type(state.content(), state.selection(), block_type);
    state.push(
        content,
        state.selection().clone(),
        ChangeType::ChangeBlockType,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKey, ContentBlock, ContentState, StyleSet};
    use pretty_assertions::assert_eq;

    fn state_with(lines: &[&str], key: &str, offset: usize) -> EditorState {
        let blocks = lines
            .iter()
            .enumerate()
            .map(|(i, text)| ContentBlock::from_text(BlockKey::from(format!("k{i}")), text))
            .collect();
        EditorState::with_content(ContentState::from_blocks(blocks))
            .with_selection(Selection::collapsed(BlockKey::from(key), offset))
    }

    #[test]
    fn test_insert_text_uses_override_style() {
        let state = EditorState::empty()
            .with_inline_style_override([InlineStyle::Bold].into_iter().collect());
        let state = insert_text(&state, "Hi");

        let block = state.content().first_block();
        assert_eq!(block.text(), "Hi");
        assert!(block.style_at(0).contains(&InlineStyle::Bold));
        assert!(block.style_at(1).contains(&InlineStyle::Bold));
        assert_eq!(state.selection().start_offset(), 2);
    }

    #[test]
    fn test_typing_continues_previous_character_style() {
        let state = EditorState::empty()
            .with_inline_style_override([InlineStyle::Red].into_iter().collect());
        let state = insert_text(&state, "a");
        assert!(state.inline_style_override().is_none());

        let state = insert_text(&state, "b");
        assert!(state.content().first_block().style_at(1).contains(&InlineStyle::Red));
    }

    #[test]
    fn test_backspace_within_and_across_blocks() {
        let state = state_with(&["ab", "cd"], "k1", 1);
        let state = backspace(&state);
        assert_eq!(state.content().plain_text(), "ab\nd");

        let state = backspace(&state);
        assert_eq!(state.content().plain_text(), "abd");
        assert_eq!(state.selection().start_offset(), 2);
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let state = state_with(&["ab"], "k0", 0);
        assert_eq!(backspace(&state), state);
    }

    #[test]
    fn test_delete_joins_next_block() {
        let state = state_with(&["ab", "cd"], "k0", 2);
        let state = delete(&state);
        assert_eq!(state.content().plain_text(), "abcd");
        assert_eq!(state.selection().start_key().as_str(), "k0");
    }

    #[test]
    fn test_toggle_inline_style_on_caret() {
        let state = toggle_inline_style(&EditorState::empty(), &InlineStyle::Underline);
        assert!(state.current_inline_style().contains(&InlineStyle::Underline));

        let state = toggle_inline_style(&state, &InlineStyle::Underline);
        assert!(state.current_inline_style().is_empty());
    }

    #[test]
    fn test_toggle_inline_style_on_range() {
        let state = state_with(&["Warn"], "k0", 0);
        let range = Selection::range(
            Position::new(BlockKey::from("k0"), 0),
            Position::new(BlockKey::from("k0"), 4),
            false,
        );
        let state = toggle_inline_style(&state.with_selection(range), &InlineStyle::Bold);

        assert!(
            state
                .content()
                .first_block()
                .characters()
                .iter()
                .all(|c| c.style.contains(&InlineStyle::Bold))
        );
    }

    #[test]
    fn test_clear_inline_styles() {
        let styles: StyleSet = [InlineStyle::Bold, InlineStyle::Code].into_iter().collect();
        let state = EditorState::empty().with_inline_style_override(styles);
        let state = clear_inline_styles(&state);

        assert_eq!(state.inline_style_override(), Some(&StyleSet::new()));
        assert!(state.current_inline_style().is_empty());
    }

    #[test]
    fn test_split_block_keeps_type() {
        let state = state_with(&["Title"], "k0", 5);
        let state = set_block_type(&state, &BlockType::Header(1));
        let state = split_block(&state);

        assert_eq!(state.content().blocks().len(), 2);
        assert_eq!(
            state.content().blocks()[1].block_type(),
            &BlockType::Header(1)
        );
    }
}
