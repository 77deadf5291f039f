use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

pub(crate) type NoteId = String;

/// Pixel offset from the host surface origin.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Size {
    pub width: f64,
    pub height: f64,
}

pub(crate) const MIN_WIDTH: f64 = 300.0;
pub(crate) const MAX_WIDTH: f64 = 800.0;
pub(crate) const MIN_HEIGHT: f64 = 250.0;
pub(crate) const MAX_HEIGHT: f64 = 600.0;

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp into `[300,800] x [250,600]`.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.min(MAX_WIDTH).max(MIN_WIDTH),
            height: self.height.min(MAX_HEIGHT).max(MIN_HEIGHT),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(MIN_WIDTH, MIN_HEIGHT)
    }
}

/// The ten background tokens a note can carry.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub(crate) enum NoteColor {
    #[default]
    #[serde(rename = "bg-yellow-200")]
    #[strum(serialize = "bg-yellow-200")]
    Yellow,
    #[serde(rename = "bg-blue-200")]
    #[strum(serialize = "bg-blue-200")]
    Blue,
    #[serde(rename = "bg-green-200")]
    #[strum(serialize = "bg-green-200")]
    Green,
    #[serde(rename = "bg-red-200")]
    #[strum(serialize = "bg-red-200")]
    Red,
    #[serde(rename = "bg-purple-200")]
    #[strum(serialize = "bg-purple-200")]
    Purple,
    #[serde(rename = "bg-pink-200")]
    #[strum(serialize = "bg-pink-200")]
    Pink,
    #[serde(rename = "bg-indigo-200")]
    #[strum(serialize = "bg-indigo-200")]
    Indigo,
    #[serde(rename = "bg-teal-200")]
    #[strum(serialize = "bg-teal-200")]
    Teal,
    #[serde(rename = "bg-orange-200")]
    #[strum(serialize = "bg-orange-200")]
    Orange,
    #[serde(rename = "bg-gray-200")]
    #[strum(serialize = "bg-gray-200")]
    Gray,
}

impl NoteColor {
    /// Background class, identical to the token.
    pub fn background_class(self) -> &'static str {
        match self {
            NoteColor::Yellow => "bg-yellow-200",
            NoteColor::Blue => "bg-blue-200",
            NoteColor::Green => "bg-green-200",
            NoteColor::Red => "bg-red-200",
            NoteColor::Purple => "bg-purple-200",
            NoteColor::Pink => "bg-pink-200",
            NoteColor::Indigo => "bg-indigo-200",
            NoteColor::Teal => "bg-teal-200",
            NoteColor::Orange => "bg-orange-200",
            NoteColor::Gray => "bg-gray-200",
        }
    }

    /// Matching border class, one shade darker than the background.
    pub fn border_class(self) -> &'static str {
        match self {
            NoteColor::Yellow => "border-yellow-300",
            NoteColor::Blue => "border-blue-300",
            NoteColor::Green => "border-green-300",
            NoteColor::Red => "border-red-300",
            NoteColor::Purple => "border-purple-300",
            NoteColor::Pink => "border-pink-300",
            NoteColor::Indigo => "border-indigo-300",
            NoteColor::Teal => "border-teal-300",
            NoteColor::Orange => "border-orange-300",
            NoteColor::Gray => "border-gray-300",
        }
    }

    /// True if `class` is any background or border class of the palette.
    pub fn is_palette_class(class: &str) -> bool {
        NoteColor::iter().any(|c| c.background_class() == class || c.border_class() == class)
    }
}

/// Commands forwarded to the formatting delegate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FormatCommand {
    Bold,
    Italic,
    Underline,
}

/// One open note, as held in its attribute store and as persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteRecord {
    #[serde(default)]
    pub id: NoteId,
    #[serde(default)]
    pub page_id: String,
    #[serde(default)]
    pub title: String,
    /// Rich markup owned by the formatting delegate.
    #[serde(default)]
    pub content: String,
    pub position: Position,
    pub size: Size,
    #[serde(rename = "isHidden", default)]
    pub hidden: bool,
    #[serde(default)]
    pub background_color: NoteColor,
    #[serde(default)]
    pub created_at: String,
}

impl NoteRecord {
    pub fn new(id: NoteId, page_id: String, position: Position, size: Size, created_at: String) -> Self {
        Self {
            id,
            page_id,
            title: String::new(),
            content: String::new(),
            position,
            size,
            hidden: false,
            background_color: NoteColor::default(),
            created_at,
        }
    }
}
