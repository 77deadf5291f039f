use crate::models::{NoteColor, NoteRecord, Position, Size};

/// A writable attribute of a note.
///
/// `id` and `createdAt` have no variant: they are fixed when the record is
/// created and cannot be written afterwards.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NoteField {
    Title(String),
    Content(String),
    Position(Position),
    Size(Size),
    Hidden(bool),
    BackgroundColor(NoteColor),
}

impl NoteField {
    pub fn key(&self) -> NoteKey {
        match self {
            NoteField::Title(_) => NoteKey::Title,
            NoteField::Content(_) => NoteKey::Content,
            NoteField::Position(_) => NoteKey::Position,
            NoteField::Size(_) => NoteKey::Size,
            NoteField::Hidden(_) => NoteKey::Hidden,
            NoteField::BackgroundColor(_) => NoteKey::BackgroundColor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoteKey {
    Id,
    PageId,
    Title,
    Content,
    Position,
    Size,
    Hidden,
    BackgroundColor,
    CreatedAt,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NoteValue {
    Text(String),
    Position(Position),
    Size(Size),
    Flag(bool),
    Color(NoteColor),
}

/// Per-note attribute store.
///
/// No validation happens here: controllers clamp before they write.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AttributeStore {
    record: NoteRecord,
}

impl AttributeStore {
    pub fn new(record: NoteRecord) -> Self {
        Self { record }
    }

    pub fn get(&self, key: NoteKey) -> NoteValue {
        let r = &self.record;
        match key {
            NoteKey::Id => NoteValue::Text(r.id.clone()),
            NoteKey::PageId => NoteValue::Text(r.page_id.clone()),
            NoteKey::Title => NoteValue::Text(r.title.clone()),
            NoteKey::Content => NoteValue::Text(r.content.clone()),
            NoteKey::Position => NoteValue::Position(r.position),
            NoteKey::Size => NoteValue::Size(r.size),
            NoteKey::Hidden => NoteValue::Flag(r.hidden),
            NoteKey::BackgroundColor => NoteValue::Color(r.background_color),
            NoteKey::CreatedAt => NoteValue::Text(r.created_at.clone()),
        }
    }

    pub fn set(&mut self, field: NoteField) {
        let r = &mut self.record;
        match field {
            NoteField::Title(v) => r.title = v,
            NoteField::Content(v) => r.content = v,
            NoteField::Position(v) => r.position = v,
            NoteField::Size(v) => r.size = v,
            NoteField::Hidden(v) => r.hidden = v,
            NoteField::BackgroundColor(v) => r.background_color = v,
        }
    }

    pub fn record(&self) -> &NoteRecord {
        &self.record
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn content(&self) -> &str {
        &self.record.content
    }

    pub fn position(&self) -> Position {
        self.record.position
    }

    pub fn size(&self) -> Size {
        self.record.size
    }

    pub fn is_hidden(&self) -> bool {
        self.record.hidden
    }

    pub fn color(&self) -> NoteColor {
        self.record.background_color
    }
}
