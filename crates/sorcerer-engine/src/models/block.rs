use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::style::{InlineStyle, StyleSet};

/// Block-level type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    /// Heading level 1..=6
    Header(u8),
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
    Other(String),
}

const HEADER_TAGS: [&str; 6] = [
    "header-one",
    "header-two",
    "header-three",
    "header-four",
    "header-five",
    "header-six",
];

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Header(level) => HEADER_TAGS
                .get(usize::from(level.saturating_sub(1)))
                .copied()
                .unwrap_or("header-six"),
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Other(tag) => tag,
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        if let Some(index) = HEADER_TAGS.iter().position(|h| *h == tag) {
            return BlockType::Header(index as u8 + 1);
        }
        match tag.as_str() {
            "unstyled" => BlockType::Unstyled,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            _ => BlockType::Other(tag),
        }
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        BlockType::from(tag.to_string())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a block, unique within one document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(uuid[..8].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for BlockKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form per-block metadata, carried through storage untouched
pub type BlockData = serde_json::Map<String, serde_json::Value>;

/// Per-character metadata: active inline styles and an optional entity reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<u32>,
}

impl CharacterMetadata {
    pub fn with_style(style: StyleSet) -> Self {
        Self {
            style,
            entity: None,
        }
    }
}

/// One paragraph-like unit of text
///
/// `characters` always holds exactly one entry per `char` of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    key: BlockKey,
    block_type: BlockType,
    depth: u32,
    text: String,
    characters: Vec<CharacterMetadata>,
    data: BlockData,
}

impl ContentBlock {
    /// Empty unstyled block with a fresh key
    pub fn empty() -> Self {
        Self::with_key(BlockKey::generate())
    }

    /// Empty unstyled block with the given key
    pub fn with_key(key: BlockKey) -> Self {
        Self {
            key,
            block_type: BlockType::Unstyled,
            depth: 0,
            text: String::new(),
            characters: Vec::new(),
            data: BlockData::new(),
        }
    }

    /// Block holding unstyled `text`
    pub fn from_text(key: BlockKey, text: &str) -> Self {
        let characters = text.chars().map(|_| CharacterMetadata::default()).collect();
        Self {
            key,
            block_type: BlockType::Unstyled,
            depth: 0,
            text: text.to_string(),
            characters,
            data: BlockData::new(),
        }
    }

    /// Build a block from parts; returns `None` when the metadata count does not match the text
    pub fn from_parts(
        key: BlockKey,
        block_type: BlockType,
        depth: u32,
        text: String,
        characters: Vec<CharacterMetadata>,
        data: BlockData,
    ) -> Option<Self> {
        if text.chars().count() != characters.len() {
            return None;
        }
        Some(Self {
            key,
            block_type,
            depth,
            text,
            characters,
            data,
        })
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.characters
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Styles of the character at `offset` (empty when out of range)
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.characters
            .get(offset)
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    pub fn with_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    /// Replace `start..end` (character offsets) with `text` carrying `style`
    pub fn splice(&self, start: usize, end: usize, text: &str, style: &StyleSet) -> Self {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());

        let mut new_text = String::with_capacity(self.text.len() + text.len());
        new_text.extend(self.text.chars().take(start));
        new_text.push_str(text);
        new_text.extend(self.text.chars().skip(end));

        let mut characters = Vec::with_capacity(self.characters.len() + text.len());
        characters.extend_from_slice(&self.characters[..start]);
        characters.extend(text.chars().map(|_| CharacterMetadata::with_style(style.clone())));
        characters.extend_from_slice(&self.characters[end..]);

        Self {
            key: self.key.clone(),
            block_type: self.block_type.clone(),
            depth: self.depth,
            text: new_text,
            characters,
            data: self.data.clone(),
        }
    }

    /// Split at `offset` into (head, tail); the tail gets `tail_key` and no data
    pub fn split_at(&self, offset: usize, tail_key: BlockKey) -> (Self, Self) {
        let offset = offset.min(self.len());
        let head = Self {
            key: self.key.clone(),
            block_type: self.block_type.clone(),
            depth: self.depth,
            text: self.text.chars().take(offset).collect(),
            characters: self.characters[..offset].to_vec(),
            data: self.data.clone(),
        };
        let tail = Self {
            key: tail_key,
            block_type: self.block_type.clone(),
            depth: self.depth,
            text: self.text.chars().skip(offset).collect(),
            characters: self.characters[offset..].to_vec(),
            data: BlockData::new(),
        };
        (head, tail)
    }

    /// Append the text and metadata of `other`, keeping this block's key and type
    pub fn join(&self, other: &ContentBlock) -> Self {
        let mut joined = self.clone();
        joined.text.push_str(&other.text);
        joined.characters.extend_from_slice(&other.characters);
        joined
    }

    /// Add or remove `style` on characters `start..end`
    pub fn apply_style(&self, start: usize, end: usize, style: &InlineStyle, enable: bool) -> Self {
        let mut updated = self.clone();
        let end = end.min(updated.len());
        for meta in updated.characters.iter_mut().take(end).skip(start) {
            if enable {
                meta.style.insert(style.clone());
            } else {
                meta.style.remove(style);
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bold() -> StyleSet {
        [InlineStyle::Bold].into_iter().collect()
    }

    #[rstest]
    #[case("unstyled", BlockType::Unstyled)]
    #[case("header-one", BlockType::Header(1))]
    #[case("header-six", BlockType::Header(6))]
    #[case("code-block", BlockType::CodeBlock)]
    #[case("atomic", BlockType::Other("atomic".to_string()))]
    fn test_block_type_tags(#[case] tag: &str, #[case] expected: BlockType) {
        let block_type = BlockType::from(tag);
        assert_eq!(block_type, expected);
        assert_eq!(block_type.as_str(), tag);
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let a = BlockKey::generate();
        let b = BlockKey::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 8);
    }

    #[test]
    fn test_splice_counts_characters_not_bytes() {
        let block = ContentBlock::from_text(BlockKey::from("a"), "héllo");
        let updated = block.splice(1, 2, "e", &bold());

        assert_eq!(updated.text(), "hello");
        assert_eq!(updated.len(), 5);
        assert_eq!(updated.style_at(1), bold());
        assert!(updated.style_at(0).is_empty());
    }

    #[test]
    fn test_split_and_join() {
        let block = ContentBlock::from_text(BlockKey::from("a"), "Hello world")
            .with_type(BlockType::Header(1));
        let (head, tail) = block.split_at(5, BlockKey::from("b"));

        assert_eq!(head.text(), "Hello");
        assert_eq!(tail.text(), " world");
        assert_eq!(tail.key().as_str(), "b");
        assert_eq!(tail.block_type(), &BlockType::Header(1));

        let joined = head.join(&tail);
        assert_eq!(joined.text(), "Hello world");
        assert_eq!(joined.key().as_str(), "a");
    }

    #[test]
    fn test_apply_style_range() {
        let block = ContentBlock::from_text(BlockKey::from("a"), "Warn me");
        let styled = block.apply_style(0, 4, &InlineStyle::Underline, true);

        assert!(styled.style_at(3).contains(&InlineStyle::Underline));
        assert!(!styled.style_at(4).contains(&InlineStyle::Underline));

        let cleared = styled.apply_style(0, 7, &InlineStyle::Underline, false);
        assert!(cleared.characters().iter().all(|c| c.style.is_empty()));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_metadata() {
        let result = ContentBlock::from_parts(
            BlockKey::from("a"),
            BlockType::Unstyled,
            0,
            "abc".to_string(),
            vec![CharacterMetadata::default()],
            BlockData::new(),
        );
        assert!(result.is_none());
    }
}
