//! Blocks: the typed content units that make up a page.
//!
//! A [`Block`] carries an opaque formatted-text `content` string, a bag of
//! presentation [`BlockProperties`] the core never interprets, and an optional
//! [`BlockData`] payload whose variant is tied to the block's [`BlockType`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identifier of a block within its page.
pub type BlockId = String;

/// Identifier of a page.
pub type PageId = String;

/// The kind of a block.
///
/// Serialized in kebab-case (`"bullet-list"`, `"heading1"`), matching the
/// names the editor front-end uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Text,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    BulletList,
    NumberedList,
    Quote,
    Code,
    Divider,
    Image,
    Video,
    Audio,
    Table,
    Database,
    Page,
}

impl BlockType {
    /// Returns `true` for types whose `content` string is shown to the user.
    #[must_use]
    pub fn is_text_bearing(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::Heading4
                | Self::Heading5
                | Self::Heading6
                | Self::BulletList
                | Self::NumberedList
                | Self::Quote
                | Self::Code
        )
    }

    /// Returns `true` for bullet and numbered list items.
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(self, Self::BulletList | Self::NumberedList)
    }

    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

/// Presentation attributes attached to a block.
///
/// Every field is optional; an all-`None` value is "empty properties". The core
/// carries these through mutations but never interprets them, except for
/// `indent` when continuing a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<TextAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_alignment: Option<MediaAlignment>,
}

impl BlockProperties {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A column definition of an embedded database block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseColumn {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// One row of an embedded database block, keyed by column id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRow {
    pub id: String,
    pub data: BTreeMap<String, String>,
}

/// A saved view (table, board, ...) of an embedded database block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: String,
}

/// Metadata describing an uploaded media file. The file bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Variant-specific payload of a block.
///
/// # Examples
///
/// ```rust
/// use blocknotes_core::{BlockData, BlockType};
///
/// let data = BlockData::PageRef { page_id: "p-1".to_string() };
/// assert!(data.fits(BlockType::Page));
/// assert!(!data.fits(BlockType::Table));
///
/// let json = serde_json::to_string(&data).unwrap();
/// assert_eq!(json, r#"{"kind":"pageRef","pageId":"p-1"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockData {
    /// A simple grid of cells with a header row.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// An embedded sub-database with typed columns and saved views.
    Database {
        columns: Vec<DatabaseColumn>,
        rows: Vec<DatabaseRow>,
        views: Vec<DatabaseView>,
    },
    /// An image, video or audio attachment.
    Media(MediaRef),
    /// A link to another page. An empty `page_id` is an unlinked placeholder.
    PageRef { page_id: PageId },
}

impl BlockData {
    /// The placeholder reference a freshly created `page` block carries.
    #[must_use]
    pub fn empty_page_ref() -> Self {
        Self::PageRef {
            page_id: String::new(),
        }
    }

    /// A 3-column table with two empty rows.
    #[must_use]
    pub fn default_table() -> Self {
        let empty_row = || vec![String::new(); 3];
        Self::Table {
            headers: (1..=3).map(|i| format!("Column {i}")).collect(),
            rows: vec![empty_row(), empty_row()],
        }
    }

    /// A database with a text `Name` column, a `Status` select column, one
    /// blank row, and table and kanban views.
    #[must_use]
    pub fn default_database() -> Self {
        let column = |id: &str, name: &str, column_type: &str| DatabaseColumn {
            id: id.to_string(),
            name: name.to_string(),
            column_type: column_type.to_string(),
            options: None,
        };
        let view = |id: &str, name: &str| DatabaseView {
            id: id.to_string(),
            name: name.to_string(),
            view_type: id.to_string(),
        };
        Self::Database {
            columns: vec![
                column("name", "Name", "text"),
                DatabaseColumn {
                    options: Some(
                        ["Not Started", "In Progress", "Done"]
                            .map(String::from)
                            .to_vec(),
                    ),
                    ..column("status", "Status", "select")
                },
            ],
            rows: vec![DatabaseRow {
                id: "1".to_string(),
                data: BTreeMap::from([
                    ("name".to_string(), String::new()),
                    ("status".to_string(), "Not Started".to_string()),
                ]),
            }],
            views: vec![view("table", "Table"), view("kanban", "Kanban")],
        }
    }

    /// The payload a fresh block of `block_type` starts with, if any.
    #[must_use]
    pub fn seed_for(block_type: BlockType) -> Option<Self> {
        match block_type {
            BlockType::Page => Some(Self::empty_page_ref()),
            BlockType::Table => Some(Self::default_table()),
            BlockType::Database => Some(Self::default_database()),
            _ => None,
        }
    }

    /// Returns `true` when this payload may be attached to a block of `block_type`.
    #[must_use]
    pub fn fits(&self, block_type: BlockType) -> bool {
        match self {
            Self::Table { .. } => block_type == BlockType::Table,
            Self::Database { .. } => block_type == BlockType::Database,
            Self::Media(_) => block_type.is_media(),
            Self::PageRef { .. } => block_type == BlockType::Page,
        }
    }
}

/// An atomic content unit inside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub properties: BlockProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BlockData>,
}

impl Block {
    /// Creates an empty block of `block_type` with a fresh id.
    ///
    /// `page` blocks start with the unlinked placeholder reference, tables and
    /// databases with a small starter grid; see [`BlockData::seed_for`].
    #[must_use]
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            block_type,
            content: String::new(),
            properties: BlockProperties::default(),
            data: BlockData::seed_for(block_type),
        }
    }

    /// Creates a block of `block_type` holding `content`.
    #[must_use]
    pub fn with_content(block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(block_type)
        }
    }

    /// Creates a `page` block referencing `page_id`.
    #[must_use]
    pub fn page_reference(page_id: impl Into<PageId>) -> Self {
        Self {
            data: Some(BlockData::PageRef {
                page_id: page_id.into(),
            }),
            ..Self::new(BlockType::Page)
        }
    }

    /// Returns the target of a page-reference block, if any.
    ///
    /// The unlinked placeholder yields `None`.
    #[must_use]
    pub fn referenced_page_id(&self) -> Option<&str> {
        match &self.data {
            Some(BlockData::PageRef { page_id }) if !page_id.is_empty() => Some(page_id),
            _ => None,
        }
    }

    /// Returns a copy of this block under a fresh id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }
}

/// A partial update for [`Block`]: supplied fields replace the stored ones,
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BlockProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BlockData>,
}

impl BlockUpdate {
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.properties.is_none() && self.data.is_none()
    }
}
