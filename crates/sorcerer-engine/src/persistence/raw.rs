//! Raw snapshot format
//!
//! Mirrors the raw content layout used by browser rich-text editors: a list of
//! block records with per-style and per-entity ranges, plus an entity map.
//! Offsets and lengths count characters of the block text.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{
    BlockData, BlockKey, BlockType, CharacterMetadata, ContentBlock, ContentState, EntityMap,
    InlineStyle,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: EntityMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: BlockKey,
    pub text: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawInlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: BlockData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: u32,
}

/// Structural problems in a raw snapshot that JSON parsing cannot catch
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RawContentError {
    #[error("snapshot has duplicate block key {0}")]
    DuplicateKey(String),
    #[error("block {key} references unknown entity {entity}")]
    UnknownEntity { key: String, entity: u32 },
}

/// Maximal runs of consecutive characters sharing a value
fn runs<T: PartialEq>(values: impl Iterator<Item = Option<T>>) -> Vec<(usize, usize, T)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, T)> = None;
    let mut len = 0;

    for (index, value) in values.enumerate() {
        len = index + 1;
        let continues = matches!(
            (&current, &value),
            (Some((_, active)), Some(v)) if active == v
        );
        if continues {
            continue;
        }
        if let Some((start, active)) = current.take() {
            out.push((start, index - start, active));
        }
        current = value.map(|v| (index, v));
    }
    if let Some((start, active)) = current {
        out.push((start, len - start, active));
    }
    out
}

fn encode_block(block: &ContentBlock) -> RawBlock {
    // Styles in order of first appearance
    let mut styles: Vec<&InlineStyle> = Vec::new();
    for meta in block.characters() {
        for style in &meta.style {
            if !styles.contains(&style) {
                styles.push(style);
            }
        }
    }

    let inline_style_ranges = styles
        .into_iter()
        .flat_map(|style| {
            runs(
                block
                    .characters()
                    .iter()
                    .map(|c| c.style.contains(style).then_some(())),
            )
            .into_iter()
            .map(move |(offset, length, ())| RawInlineStyleRange {
                offset,
                length,
                style: style.clone(),
            })
        })
        .collect();

    let entity_ranges = runs(block.characters().iter().map(|c| c.entity))
        .into_iter()
        .map(|(offset, length, key)| RawEntityRange {
            offset,
            length,
            key,
        })
        .collect();

    RawBlock {
        key: block.key().clone(),
        text: block.text().to_string(),
        block_type: block.block_type().clone(),
        depth: block.depth(),
        inline_style_ranges,
        entity_ranges,
        data: block.data().clone(),
    }
}

fn decode_block(raw: RawBlock, entity_map: &EntityMap) -> Result<ContentBlock, RawContentError> {
    let len = raw.text.chars().count();
    let mut characters = vec![CharacterMetadata::default(); len];

    for range in &raw.inline_style_ranges {
        let end = range.offset.saturating_add(range.length).min(len);
        for meta in characters.iter_mut().take(end).skip(range.offset) {
            meta.style.insert(range.style.clone());
        }
    }

    for range in &raw.entity_ranges {
        if !entity_map.contains_key(&range.key) {
            return Err(RawContentError::UnknownEntity {
                key: raw.key.to_string(),
                entity: range.key,
            });
        }
        let end = range.offset.saturating_add(range.length).min(len);
        for meta in characters.iter_mut().take(end).skip(range.offset) {
            meta.entity = Some(range.key);
        }
    }

    // Lengths match by construction
    let block = ContentBlock::from_parts(
        raw.key,
        raw.block_type,
        raw.depth,
        raw.text,
        characters,
        raw.data,
    );
    Ok(block.unwrap_or_else(ContentBlock::empty))
}

impl RawContent {
    /// Raw form of `content`
    pub fn from_content(content: &ContentState) -> Self {
        Self {
            blocks: content.blocks().iter().map(encode_block).collect(),
            entity_map: content.entity_map().clone(),
        }
    }

    /// Rebuild content; style ranges past the end of the text are clamped
    pub fn into_content(self) -> Result<ContentState, RawContentError> {
        let mut seen = HashSet::new();
        for block in &self.blocks {
            if !seen.insert(block.key.clone()) {
                return Err(RawContentError::DuplicateKey(block.key.to_string()));
            }
        }

        let entity_map = self.entity_map;
        let blocks = self
            .blocks
            .into_iter()
            .map(|raw| decode_block(raw, &entity_map))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ContentState::from_blocks(blocks).with_entity_map(entity_map))
    }
}
