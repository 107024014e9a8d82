//! Content-level edit primitives
//!
//! Each function takes a content state and a selection and returns the new
//! content together with the selection that should follow the edit. They know
//! nothing about undo history or style overrides; `EditorState::push` adds that.

use crate::models::{
    BlockKey, BlockType, ContentBlock, ContentState, InlineStyle, Selection, StyleSet,
};

/// Block indices and offsets covered by a selection, in document order
struct Span {
    start_index: usize,
    start_offset: usize,
    end_index: usize,
    end_offset: usize,
}

fn span_of(content: &ContentState, selection: &Selection) -> Option<Span> {
    let start = selection.start();
    let end = selection.end();
    let start_index = content.block_index(&start.key)?;
    let end_index = content.block_index(&end.key)?;
    let start_len = content.blocks()[start_index].len();
    let end_len = content.blocks()[end_index].len();
    Some(Span {
        start_index,
        start_offset: start.offset.min(start_len),
        end_index,
        end_offset: end.offset.min(end_len),
    })
}

/// Remove the selected range, joining blocks when it spans several
pub fn remove_range(content: &ContentState, selection: &Selection) -> (ContentState, Selection) {
    let Some(span) = span_of(content, selection) else {
        return (content.clone(), selection.clone());
    };
    let blocks = content.blocks();
    let start_block = &blocks[span.start_index];
    let caret = Selection::collapsed(start_block.key().clone(), span.start_offset);

    if span.start_index == span.end_index {
        let block = start_block.splice(
            span.start_offset,
            span.end_offset,
            "",
            &StyleSet::new(),
        );
        return (content.replace_block(block), caret);
    }

    let head = start_block.splice(span.start_offset, start_block.len(), "", &StyleSet::new());
    let end_block = &blocks[span.end_index];
    let (_, tail) = end_block.split_at(span.end_offset, end_block.key().clone());
    let merged = head.join(&tail);

    (
        content.splice_blocks(span.start_index, span.end_index, vec![merged]),
        caret,
    )
}

/// Replace the selection with `text`, every inserted character carrying `style`
pub fn replace_text(
    content: &ContentState,
    selection: &Selection,
    text: &str,
    style: &StyleSet,
) -> (ContentState, Selection) {
    let (content, caret) = remove_range(content, selection);
    let key = caret.start_key().clone();
    let offset = caret.start_offset();
    let Some(block) = content.block_for_key(&key) else {
        return (content, caret);
    };

    let block = block.splice(offset, offset, text, style);
    let inserted = text.chars().count();
    (
        content.replace_block(block),
        Selection::collapsed(key, offset + inserted),
    )
}

/// Split the block at the caret (removing any selected range first)
///
/// The new block gets a fresh key and the split block's type and depth; the
/// caret lands at its start.
pub fn split_block(content: &ContentState, selection: &Selection) -> (ContentState, Selection) {
    let (content, caret) = remove_range(content, selection);
    let Some(index) = content.block_index(caret.start_key()) else {
        return (content, caret);
    };

    let tail_key = BlockKey::generate();
    let (head, tail) = content.blocks()[index].split_at(caret.start_offset(), tail_key.clone());
    (
        content.splice_blocks(index, index, vec![head, tail]),
        Selection::collapsed(tail_key, 0),
    )
}

/// Set the type of every block touched by the selection
pub fn set_block_type(
    content: &ContentState,
    selection: &Selection,
    block_type: &BlockType,
) -> ContentState {
    let Some(span) = span_of(content, selection) else {
        return content.clone();
    };
    let updated: Vec<ContentBlock> = content.blocks()[span.start_index..=span.end_index]
        .iter()
        .map(|b| b.clone().with_type(block_type.clone()))
        .collect();
    content.splice_blocks(span.start_index, span.end_index, updated)
}

/// Add or remove `style` on every character in the selection
pub fn apply_inline_style(
    content: &ContentState,
    selection: &Selection,
    style: &InlineStyle,
    enable: bool,
) -> ContentState {
    let Some(span) = span_of(content, selection) else {
        return content.clone();
    };
    let updated: Vec<ContentBlock> = content.blocks()[span.start_index..=span.end_index]
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let index = span.start_index + i;
            let from = if index == span.start_index {
                span.start_offset
            } else {
                0
            };
            let to = if index == span.end_index {
                span.end_offset
            } else {
                block.len()
            };
            block.apply_style(from, to, style, enable)
        })
        .collect();
    content.splice_blocks(span.start_index, span.end_index, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use pretty_assertions::assert_eq;

    fn content() -> ContentState {
        ContentState::from_blocks(vec![
            ContentBlock::from_text(BlockKey::from("a"), "Hello"),
            ContentBlock::from_text(BlockKey::from("b"), "brave"),
            ContentBlock::from_text(BlockKey::from("c"), "world"),
        ])
    }

    fn range(a: (&str, usize), b: (&str, usize)) -> Selection {
        Selection::range(
            Position::new(BlockKey::from(a.0), a.1),
            Position::new(BlockKey::from(b.0), b.1),
            false,
        )
    }

    #[test]
    fn test_remove_range_within_block() {
        let (content, caret) = remove_range(&content(), &range(("a", 0), ("a", 2)));
        assert_eq!(content.first_block().text(), "llo");
        assert_eq!(caret, Selection::collapsed(BlockKey::from("a"), 0));
    }

    #[test]
    fn test_remove_range_across_blocks() {
        let (content, caret) = remove_range(&content(), &range(("a", 4), ("c", 1)));
        assert_eq!(content.blocks().len(), 1);
        assert_eq!(content.first_block().text(), "Hellorld");
        assert_eq!(caret.start_offset(), 4);
    }

    #[test]
    fn test_replace_text_moves_caret() {
        let bold: StyleSet = [InlineStyle::Bold].into_iter().collect();
        let caret = Selection::collapsed(BlockKey::from("b"), 5);
        let (content, caret) = replace_text(&content(), &caret, "st", &bold);

        assert_eq!(content.blocks()[1].text(), "bravest");
        assert_eq!(content.blocks()[1].style_at(5), bold);
        assert_eq!(caret.start_offset(), 7);
    }

    #[test]
    fn test_split_block_moves_tail_to_new_block() {
        let caret = Selection::collapsed(BlockKey::from("a"), 2);
        let (content, caret) = split_block(&content(), &caret);

        assert_eq!(content.blocks().len(), 4);
        assert_eq!(content.blocks()[0].text(), "He");
        assert_eq!(content.blocks()[1].text(), "llo");
        assert_eq!(caret.start_key(), content.blocks()[1].key());
        assert_eq!(caret.start_offset(), 0);
    }

    #[test]
    fn test_set_block_type_over_range() {
        let content = set_block_type(
            &content(),
            &range(("a", 1), ("b", 1)),
            &BlockType::CodeBlock,
        );
        assert_eq!(content.blocks()[0].block_type(), &BlockType::CodeBlock);
        assert_eq!(content.blocks()[1].block_type(), &BlockType::CodeBlock);
        assert_eq!(content.blocks()[2].block_type(), &BlockType::Unstyled);
    }

    #[test]
    fn test_apply_inline_style_across_blocks() {
        let content = apply_inline_style(
            &content(),
            &range(("a", 3), ("b", 2)),
            &InlineStyle::Red,
            true,
        );
        let red = |block: &ContentBlock, i: usize| block.style_at(i).contains(&InlineStyle::Red);

        assert!(!red(&content.blocks()[0], 2));
        assert!(red(&content.blocks()[0], 3));
        assert!(red(&content.blocks()[1], 1));
        assert!(!red(&content.blocks()[1], 2));
    }
}
