//! Typing shortcuts
//!
//! A trigger fires when the block under a collapsed caret starts with one of
//! the prefixes in [`TRIGGERS`] and the caret sits exactly at the end of that
//! prefix. The prefix is removed, the styles active at the caret are cleared,
//! and the rule's block type and/or inline style are applied.
//!
//! Rules are tried in table order and the first match wins. Every prefix ends
//! with a space, so none is a textual prefix of another: `"** "` never matches
//! the `"* "` rule, and typing `*`, `*`, space always lands on RED.

use crate::editing::modifier;
use crate::editing::rich;
use crate::editing::state::{ChangeType, EditorState};
use crate::models::{BlockType, InlineStyle, Position, Selection};

/// Which block type a trigger applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerBlock {
    HeaderOne,
    CodeBlock,
}

impl TriggerBlock {
    pub fn block_type(self) -> BlockType {
        match self {
            TriggerBlock::HeaderOne => BlockType::Header(1),
            TriggerBlock::CodeBlock => BlockType::CodeBlock,
        }
    }
}

/// Which inline style a trigger enables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStyle {
    Bold,
    Red,
    Underline,
    Code,
}

impl TriggerStyle {
    pub fn inline_style(self) -> InlineStyle {
        match self {
            TriggerStyle::Bold => InlineStyle::Bold,
            TriggerStyle::Red => InlineStyle::Red,
            TriggerStyle::Underline => InlineStyle::Underline,
            TriggerStyle::Code => InlineStyle::Code,
        }
    }
}

/// One typing shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRule {
    pub prefix: &'static str,
    pub block_type: Option<TriggerBlock>,
    pub char_style: Option<TriggerStyle>,
}

/// The shortcut table, in evaluation order
pub const TRIGGERS: [TriggerRule; 5] = [
    TriggerRule {
        prefix: "# ",
        block_type: Some(TriggerBlock::HeaderOne),
        char_style: None,
    },
    TriggerRule {
        prefix: "* ",
        block_type: None,
        char_style: Some(TriggerStyle::Bold),
    },
    TriggerRule {
        prefix: "** ",
        block_type: None,
        char_style: Some(TriggerStyle::Red),
    },
    TriggerRule {
        prefix: "*** ",
        block_type: None,
        char_style: Some(TriggerStyle::Underline),
    },
    TriggerRule {
        prefix: "``` ",
        block_type: Some(TriggerBlock::CodeBlock),
        char_style: Some(TriggerStyle::Code),
    },
];

impl TriggerRule {
    /// Length of the prefix in characters
    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Whether this rule fires for `state`
    pub fn matches(&self, state: &EditorState) -> bool {
        let selection = state.selection();
        if !selection.is_collapsed() || selection.start_offset() != self.prefix_len() {
            return false;
        }
        state
            .content()
            .block_for_key(selection.start_key())
            .is_some_and(|block| block.text().starts_with(self.prefix))
    }
}

/// Apply `rule` to `state` if it matches
///
/// Returns the transformed state and `true` on a match, otherwise the input
/// state untouched and `false`.
pub fn try_apply_trigger(state: &EditorState, rule: &TriggerRule) -> (EditorState, bool) {
    if !rule.matches(state) {
        return (state.clone(), false);
    }

    let key = state.selection().start_key().clone();
    let prefix = Selection::range(
        Position::new(key.clone(), 0),
        Position::new(key, rule.prefix_len()),
        false,
    );
    let (content, caret) = modifier::remove_range(state.content(), &prefix);
    let mut next = state.push(content, caret, ChangeType::RemoveRange);

    next = rich::clear_inline_styles(&next);

    if let Some(block) = rule.block_type {
        next = rich::set_block_type(&next, &block.block_type());
    }
    if let Some(style) = rule.char_style {
        next = rich::toggle_inline_style(&next, &style.inline_style());
    }

    log::debug!(
        "trigger {:?} applied (block: {:?}, style: {:?})",
        rule.prefix,
        rule.block_type,
        rule.char_style
    );
    (next, true)
}

/// Run `state` through the trigger table, first match wins
pub fn apply_triggers(state: &EditorState) -> (EditorState, bool) {
    for rule in &TRIGGERS {
        let (next, matched) = try_apply_trigger(state, rule);
        if matched {
            return (next, true);
        }
    }
    (state.clone(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKey, ContentBlock, ContentState, StyleSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn typed(text: &str) -> EditorState {
        let key = BlockKey::from("k");
        let content = ContentState::from_blocks(vec![ContentBlock::from_text(key.clone(), text)]);
        EditorState::with_content(content)
            .with_selection(Selection::collapsed(key, text.chars().count()))
    }

    fn styles(list: &[InlineStyle]) -> StyleSet {
        list.iter().cloned().collect()
    }

    #[rstest]
    #[case("# ", BlockType::Header(1), &[])]
    #[case("* ", BlockType::Unstyled, &[InlineStyle::Bold])]
    #[case("** ", BlockType::Unstyled, &[InlineStyle::Red])]
    #[case("*** ", BlockType::Unstyled, &[InlineStyle::Underline])]
    #[case("``` ", BlockType::CodeBlock, &[InlineStyle::Code])]
    fn test_each_trigger(
        #[case] prefix: &str,
        #[case] block_type: BlockType,
        #[case] expected: &[InlineStyle],
    ) {
        let (state, matched) = apply_triggers(&typed(prefix));

        assert!(matched);
        let block = state.content().first_block();
        assert_eq!(block.text(), "");
        assert_eq!(block.block_type(), &block_type);
        assert_eq!(state.current_inline_style(), styles(expected));
        assert_eq!(state.selection().start_offset(), 0);
    }

    #[rstest]
    #[case("#")]
    #[case("#  ")]
    #[case("hello")]
    #[case("*")]
    #[case("**")]
    #[case("``` x")]
    #[case("")]
    fn test_non_matching_text_is_untouched(#[case] text: &str) {
        let input = typed(text);
        let (state, matched) = apply_triggers(&input);

        assert!(!matched);
        assert_eq!(state, input);
    }

    #[test]
    fn test_caret_must_sit_at_prefix_end() {
        let key = BlockKey::from("k");
        let content =
            ContentState::from_blocks(vec![ContentBlock::from_text(key.clone(), "# Hello")]);
        let state = EditorState::with_content(content).with_selection(Selection::collapsed(key, 7));

        let (after, matched) = apply_triggers(&state);
        assert!(!matched);
        assert_eq!(after, state);
    }

    #[test]
    fn test_range_selection_never_matches() {
        let key = BlockKey::from("k");
        let content = ContentState::from_blocks(vec![ContentBlock::from_text(key.clone(), "# ")]);
        let selection = Selection::range(
            Position::new(key.clone(), 0),
            Position::new(key, 2),
            false,
        );
        let state = EditorState::with_content(content).with_selection(selection);

        assert!(!TRIGGERS[0].matches(&state));
    }

    #[test]
    fn test_prefix_before_existing_text_keeps_the_text() {
        let key = BlockKey::from("k");
        let content =
            ContentState::from_blocks(vec![ContentBlock::from_text(key.clone(), "# Notes")]);
        let state = EditorState::with_content(content).with_selection(Selection::collapsed(key, 2));

        let (after, matched) = apply_triggers(&state);
        assert!(matched);
        assert_eq!(after.content().first_block().text(), "Notes");
        assert_eq!(after.content().first_block().block_type(), &BlockType::Header(1));
    }

    #[test]
    fn test_trigger_clears_previous_styles() {
        let state = typed("* ").with_inline_style_override(styles(&[InlineStyle::Code]));
        let (after, matched) = apply_triggers(&state);

        assert!(matched);
        assert_eq!(after.current_inline_style(), styles(&[InlineStyle::Bold]));
    }

    #[test]
    fn test_only_the_named_rule_is_tried() {
        let (after, matched) = try_apply_trigger(&typed("** "), &TRIGGERS[1]);
        assert!(!matched);
        assert_eq!(after.content().first_block().text(), "** ");

        let (_, matched) = try_apply_trigger(&typed("** "), &TRIGGERS[2]);
        assert!(matched);
    }

    #[test]
    fn test_trigger_is_undoable() {
        let (after, _) = apply_triggers(&typed("# "));
        assert!(after.can_undo());

        let restored = std::iter::successors(Some(after), |s| s.can_undo().then(|| s.undo()))
            .last()
            .unwrap();
        assert_eq!(restored.content().first_block().text(), "# ");
    }
}
