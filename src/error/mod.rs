#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NoteErrorKind {
    /// Malformed serialized tree or unknown palette token.
    Parse,
    /// Restore of a note that is already open. Logged, never returned.
    DuplicateId,
    /// Image failed to load; reported to the user.
    ImageLoad,
    /// Operation aimed at a note (or dialog target) that is not open.
    MissingTarget,
}

#[derive(Clone, Debug)]
pub(crate) struct NoteError {
    pub kind: NoteErrorKind,
    pub message: String,
}

impl std::fmt::Display for NoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NoteError {}

impl NoteError {
    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: NoteErrorKind::Parse,
            message: format!("malformed note data: {e}"),
        }
    }

    pub fn duplicate_id(id: &str) -> Self {
        Self {
            kind: NoteErrorKind::DuplicateId,
            message: format!("note {id} is already open"),
        }
    }

    pub fn image_load(source: &str) -> Self {
        Self {
            kind: NoteErrorKind::ImageLoad,
            message: format!("Image failed to load, check that the source is correct: {source}"),
        }
    }

    pub fn missing_target(what: &str) -> Self {
        Self {
            kind: NoteErrorKind::MissingTarget,
            message: format!("no target for {what}"),
        }
    }
}

pub(crate) type NoteResult<T> = Result<T, NoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_cause() {
        let e = NoteError::parse("expected value at line 1 column 1");
        assert_eq!(e.kind, NoteErrorKind::Parse);
        assert!(e.to_string().contains("line 1 column 1"));
    }

    #[test]
    fn test_duplicate_id_message_names_note() {
        let e = NoteError::duplicate_id("note_1_0");
        assert_eq!(e.kind, NoteErrorKind::DuplicateId);
        assert_eq!(e.to_string(), "note note_1_0 is already open");
    }
}
