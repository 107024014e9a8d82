use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::block::{BlockKey, ContentBlock};
use crate::models::selection::Position;

/// Data attached to a run of characters (links, mentions, ...)
///
/// The editor never creates entities itself; they are kept so stored
/// documents round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Entities by key, referenced from `CharacterMetadata::entity`
pub type EntityMap = BTreeMap<u32, Entity>;

/// Ordered sequence of blocks making up a document
///
/// Never empty: a fresh document holds a single empty unstyled block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentState {
    blocks: Vec<ContentBlock>,
    entity_map: EntityMap,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContentState {
    pub fn empty() -> Self {
        Self {
            blocks: vec![ContentBlock::empty()],
            entity_map: EntityMap::new(),
        }
    }

    /// Content from blocks; an empty list becomes a single empty block
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self {
            blocks,
            entity_map: EntityMap::new(),
        }
    }

    pub fn with_entity_map(mut self, entity_map: EntityMap) -> Self {
        self.entity_map = entity_map;
        self
    }

    /// One unstyled block per line of `text`
    pub fn from_text(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .map(|line| ContentBlock::from_text(BlockKey::generate(), line))
            .collect();
        Self::from_blocks(blocks)
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn entity_map(&self) -> &EntityMap {
        &self.entity_map
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key() == key)
    }

    pub fn block_for_key(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.key() == key)
    }

    pub fn block_before(&self, key: &BlockKey) -> Option<&ContentBlock> {
        let index = self.block_index(key)?;
        index.checked_sub(1).map(|i| &self.blocks[i])
    }

    pub fn block_after(&self, key: &BlockKey) -> Option<&ContentBlock> {
        let index = self.block_index(key)?;
        self.blocks.get(index + 1)
    }

    /// Plain text of the document, blocks joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when `a` comes strictly after `b` in document order
    pub fn is_after(&self, a: &Position, b: &Position) -> bool {
        match (self.block_index(&a.key), self.block_index(&b.key)) {
            (Some(ia), Some(ib)) if ia != ib => ia > ib,
            _ => a.offset > b.offset,
        }
    }

    /// Replace the block with the same key as `block`
    pub fn replace_block(&self, block: ContentBlock) -> Self {
        let mut blocks = self.blocks.clone();
        if let Some(slot) = blocks.iter_mut().find(|b| b.key() == block.key()) {
            *slot = block;
        }
        Self {
            blocks,
            entity_map: self.entity_map.clone(),
        }
    }

    /// Replace blocks `start..=end` (by index) with `replacement`
    pub(crate) fn splice_blocks(
        &self,
        start: usize,
        end: usize,
        replacement: Vec<ContentBlock>,
    ) -> Self {
        let mut blocks = self.blocks.clone();
        blocks.splice(start..=end, replacement);
        Self::from_blocks(blocks).with_entity_map(self.entity_map.clone())
    }
}
