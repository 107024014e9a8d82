pub mod block;
pub mod content;
pub mod selection;
pub mod style;

pub use block::{BlockData, BlockKey, BlockType, CharacterMetadata, ContentBlock};
pub use content::{ContentState, Entity, EntityMap};
pub use selection::{Position, Selection};
pub use style::{InlineStyle, StyleAttributes, StyleColor, StyleSet, resolve_styles, style_attributes};
