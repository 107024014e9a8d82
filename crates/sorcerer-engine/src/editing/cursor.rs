//! Caret movement and selection extension

use crate::editing::state::EditorState;
use crate::models::{ContentState, Position, Selection};

/// Direction of a caret movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

fn target(content: &ContentState, from: &Position, motion: Motion) -> Position {
    let Some(block) = content.block_for_key(&from.key) else {
        return from.clone();
    };
    let offset = from.offset.min(block.len());

    match motion {
        Motion::Left if offset > 0 => Position::new(from.key.clone(), offset - 1),
        Motion::Left => content
            .block_before(&from.key)
            .map(|b| Position::new(b.key().clone(), b.len()))
            .unwrap_or_else(|| Position::new(from.key.clone(), 0)),
        Motion::Right if offset < block.len() => Position::new(from.key.clone(), offset + 1),
        Motion::Right => content
            .block_after(&from.key)
            .map(|b| Position::new(b.key().clone(), 0))
            .unwrap_or_else(|| Position::new(from.key.clone(), offset)),
        Motion::Up => content
            .block_before(&from.key)
            .map(|b| Position::new(b.key().clone(), offset.min(b.len())))
            .unwrap_or_else(|| Position::new(from.key.clone(), 0)),
        Motion::Down => content
            .block_after(&from.key)
            .map(|b| Position::new(b.key().clone(), offset.min(b.len())))
            .unwrap_or_else(|| Position::new(from.key.clone(), block.len())),
        Motion::LineStart => Position::new(from.key.clone(), 0),
        Motion::LineEnd => Position::new(from.key.clone(), block.len()),
    }
}

/// Move the caret, collapsing any selection
///
/// Left/Right on a range collapse it to its start/end instead of moving.
pub fn move_caret(state: &EditorState, motion: Motion) -> EditorState {
    let selection = state.selection();
    let position = if selection.is_collapsed() {
        target(state.content(), selection.focus(), motion)
    } else {
        match motion {
            Motion::Left => selection.start().clone(),
            Motion::Right => selection.end().clone(),
            _ => target(state.content(), selection.focus(), motion),
        }
    };
    state.with_selection(Selection::collapsed(position.key, position.offset))
}

/// Move the focus end of the selection, keeping the anchor in place
pub fn extend_selection(state: &EditorState, motion: Motion) -> EditorState {
    let selection = state.selection();
    let focus = target(state.content(), selection.focus(), motion);
    let anchor = selection.anchor().clone();
    let is_backward = state.content().is_after(&anchor, &focus);
    state.with_selection(Selection::range(anchor, focus, is_backward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKey, ContentBlock};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn state_at(key: &str, offset: usize) -> EditorState {
        let content = ContentState::from_blocks(vec![
            ContentBlock::from_text(BlockKey::from("a"), "one"),
            ContentBlock::from_text(BlockKey::from("b"), "second"),
        ]);
        EditorState::with_content(content)
            .with_selection(Selection::collapsed(BlockKey::from(key), offset))
    }

    #[rstest]
    #[case(("a", 1), Motion::Left, ("a", 0))]
    #[case(("b", 0), Motion::Left, ("a", 3))]
    #[case(("a", 3), Motion::Right, ("b", 0))]
    #[case(("b", 6), Motion::Right, ("b", 6))]
    #[case(("b", 5), Motion::Up, ("a", 3))]
    #[case(("a", 2), Motion::Down, ("b", 2))]
    #[case(("a", 0), Motion::Up, ("a", 0))]
    #[case(("b", 2), Motion::Down, ("b", 6))]
    #[case(("b", 2), Motion::LineStart, ("b", 0))]
    #[case(("a", 0), Motion::LineEnd, ("a", 3))]
    fn test_move_caret(
        #[case] from: (&str, usize),
        #[case] motion: Motion,
        #[case] expected: (&str, usize),
    ) {
        let moved = move_caret(&state_at(from.0, from.1), motion);
        assert_eq!(
            moved.selection(),
            &Selection::collapsed(BlockKey::from(expected.0), expected.1)
        );
    }

    #[test]
    fn test_extend_selection_backwards() {
        let state = extend_selection(&state_at("b", 0), Motion::Left);
        let selection = state.selection();

        assert!(!selection.is_collapsed());
        assert!(selection.is_backward());
        assert_eq!(selection.start(), &Position::new(BlockKey::from("a"), 3));
        assert_eq!(selection.end(), &Position::new(BlockKey::from("b"), 0));
    }

    #[test]
    fn test_left_collapses_range_to_start() {
        let state = extend_selection(&state_at("a", 0), Motion::LineEnd);
        let state = move_caret(&state, Motion::Left);
        assert_eq!(state.selection(), &Selection::collapsed(BlockKey::from("a"), 0));
    }
}
