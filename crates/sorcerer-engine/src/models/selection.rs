use crate::models::block::BlockKey;

/// A caret position: block key plus character offset into that block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub key: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// Caret or highlighted range
///
/// `anchor` is where the selection started, `focus` is where it ends (the
/// caret). `is_backward` records whether the focus lies before the anchor in
/// document order, so `start`/`end` can be answered without the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor: Position,
    focus: Position,
    is_backward: bool,
}

impl Selection {
    /// Collapsed selection (a caret)
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        let position = Position::new(key, offset);
        Self {
            anchor: position.clone(),
            focus: position,
            is_backward: false,
        }
    }

    /// Range selection; the caller states whether focus precedes anchor
    pub fn range(anchor: Position, focus: Position, is_backward: bool) -> Self {
        Self {
            anchor,
            focus,
            is_backward,
        }
    }

    pub fn anchor(&self) -> &Position {
        &self.anchor
    }

    pub fn focus(&self) -> &Position {
        &self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.is_backward
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Document-ordered first end of the selection
    pub fn start(&self) -> &Position {
        if self.is_backward {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Document-ordered last end of the selection
    pub fn end(&self) -> &Position {
        if self.is_backward {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn start_key(&self) -> &BlockKey {
        &self.start().key
    }

    pub fn start_offset(&self) -> usize {
        self.start().offset
    }

    pub fn end_offset(&self) -> usize {
        self.end().offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_selection() {
        let selection = Selection::collapsed(BlockKey::from("a"), 2);
        assert!(selection.is_collapsed());
        assert_eq!(selection.start(), selection.end());
        assert_eq!(selection.start_offset(), 2);
    }

    #[test]
    fn test_backward_selection_orders_ends() {
        let anchor = Position::new(BlockKey::from("b"), 1);
        let focus = Position::new(BlockKey::from("a"), 3);
        let selection = Selection::range(anchor.clone(), focus.clone(), true);

        assert!(!selection.is_collapsed());
        assert_eq!(selection.start(), &focus);
        assert_eq!(selection.end(), &anchor);
        assert_eq!(selection.start_key().as_str(), "a");
    }

    #[test]
    fn test_same_offset_in_different_blocks_is_not_collapsed() {
        let selection = Selection::range(
            Position::new(BlockKey::from("a"), 2),
            Position::new(BlockKey::from("b"), 2),
            false,
        );
        assert!(!selection.is_collapsed());
    }
}
