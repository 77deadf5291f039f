use crate::error::{NoteError, NoteResult};
use crate::models::NoteRecord;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Transport-neutral tree handed to (and received from) the persistence side.
pub(crate) type NoteTree = Value;

/// Convert a record into a tree. `position` and `size` become nested
/// mappings so each numeric leaf is addressable on its own.
pub(crate) fn serialize(record: &NoteRecord) -> NoteTree {
    let mut root = Map::new();
    root.insert("id".to_string(), Value::from(record.id.clone()));
    root.insert("pageId".to_string(), Value::from(record.page_id.clone()));
    root.insert("title".to_string(), Value::from(record.title.clone()));
    root.insert("content".to_string(), Value::from(record.content.clone()));
    root.insert(
        "position".to_string(),
        nested([("x", record.position.x), ("y", record.position.y)]),
    );
    root.insert(
        "size".to_string(),
        nested([("width", record.size.width), ("height", record.size.height)]),
    );
    root.insert("isHidden".to_string(), Value::from(record.hidden));
    root.insert(
        "backgroundColor".to_string(),
        Value::from(record.background_color.as_ref()),
    );
    root.insert("createdAt".to_string(), Value::from(record.created_at.clone()));
    Value::Object(root)
}

fn nested<const N: usize>(leaves: [(&str, f64); N]) -> Value {
    let mut m = Map::new();
    for (k, v) in leaves {
        m.insert(k.to_string(), Value::from(v));
    }
    Value::Object(m)
}

/// Inverse of [`serialize`].
///
/// Rejects anything that is not a mapping, missing or non-numeric geometry,
/// and palette tokens outside the fixed ten.
pub(crate) fn deserialize(tree: &NoteTree) -> NoteResult<NoteRecord> {
    let Some(root) = tree.as_object() else {
        return Err(NoteError::parse("note tree must be a mapping"));
    };

    for key in ["position", "size"] {
        match root.get(key) {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(NoteError::parse(format!("`{key}` must be a mapping"))),
            None => return Err(NoteError::parse(format!("missing `{key}`"))),
        }
    }

    NoteRecord::deserialize(tree).map_err(NoteError::parse)
}

/// Parse JSON text into a tree.
pub(crate) fn parse_tree(json: &str) -> NoteResult<NoteTree> {
    serde_json::from_str(json).map_err(NoteError::parse)
}

pub(crate) fn to_json_string(record: &NoteRecord) -> String {
    serialize(record).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteErrorKind;
    use crate::models::{NoteColor, Position, Size};

    fn sample() -> NoteRecord {
        NoteRecord {
            id: "note_1700000000000_3".to_string(),
            page_id: "page_42".to_string(),
            title: "Test".to_string(),
            content: "<div>hello <i>there</i></div>".to_string(),
            position: Position::new(120.5, 88.0),
            size: Size::new(800.0, 250.0),
            hidden: true,
            background_color: NoteColor::Purple,
            created_at: "2026-10-19T08:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_serialize_tree_shape() {
        let tree = serialize(&sample());
        assert_eq!(tree["id"], "note_1700000000000_3");
        assert_eq!(tree["pageId"], "page_42");
        assert_eq!(tree["position"]["x"], 120.5);
        assert_eq!(tree["size"]["width"], 800.0);
        assert_eq!(tree["isHidden"], true);
        assert_eq!(tree["backgroundColor"], "bg-purple-200");
        assert_eq!(tree["createdAt"], "2026-10-19T08:00:00.000Z");
        assert_eq!(tree.as_object().map(|m| m.len()), Some(9));
    }

    #[test]
    fn test_round_trip_is_structurally_equal() {
        let r = sample();
        assert_eq!(deserialize(&serialize(&r)).ok(), Some(r.clone()));

        let text = to_json_string(&r);
        let back = parse_tree(&text).and_then(|t| deserialize(&t));
        assert_eq!(back.ok(), Some(r));
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let tree = serde_json::json!({
            "id": "note_1_0",
            "position": {"x": 10, "y": 20},
            "size": {"width": 320, "height": 260}
        });
        let r = deserialize(&tree).expect("minimal tree should parse");
        assert_eq!(r.title, "");
        assert!(!r.hidden);
        assert_eq!(r.background_color, NoteColor::Yellow);
        assert_eq!(r.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_deserialize_rejects_malformed_input() {
        let cases = [
            serde_json::json!([1, 2, 3]),
            serde_json::json!({"id": "a", "size": {"width": 1, "height": 1}}),
            serde_json::json!({"id": "a", "position": [1, 2], "size": {"width": 1, "height": 1}}),
            serde_json::json!({"id": "a", "position": {"x": "left", "y": 0}, "size": {"width": 1, "height": 1}}),
            serde_json::json!({"id": "a", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}, "backgroundColor": "bg-black"}),
        ];
        for tree in cases {
            let err = deserialize(&tree).expect_err("tree should be rejected");
            assert_eq!(err.kind, NoteErrorKind::Parse);
        }
    }

    #[test]
    fn test_parse_tree_rejects_bad_json() {
        let err = parse_tree("{\"id\": ").expect_err("truncated json");
        assert_eq!(err.kind, NoteErrorKind::Parse);
    }
}
