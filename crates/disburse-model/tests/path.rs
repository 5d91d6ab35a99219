//! Property tests for path parsing and document writes.

use proptest::prelude::*;
use serde_json::{Value, json};

use disburse_model::{Path, Segment};

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,8}".prop_map(Segment::Key),
        (0usize..50).prop_map(Segment::Index),
    ]
}

fn path_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(segment(), 1..6).prop_map(|segments| {
        segments
            .into_iter()
            .fold(Path::root(), |path, segment| match segment {
                Segment::Key(key) => path.child(key),
                Segment::Index(index) => path.index(index),
            })
    })
}

proptest! {
    #[test]
    fn parse_display_roundtrip(path in path_strategy()) {
        let text = path.to_string();
        let reparsed = Path::parse(&text).unwrap();
        prop_assert_eq!(&reparsed, &path);
        prop_assert_eq!(Path::parse(&reparsed.to_string()).unwrap(), reparsed);
    }

    #[test]
    fn set_then_get_returns_value(path in path_strategy(), n in any::<i64>()) {
        let mut doc = json!({});
        if path.set(&mut doc, json!(n)).is_ok() {
            prop_assert_eq!(path.get(&doc), Some(&json!(n)));
        }
    }

    #[test]
    fn set_on_empty_document_never_conflicts(path in path_strategy()) {
        let mut doc = Value::Null;
        prop_assert!(path.set(&mut doc, json!("x")).is_ok());
        prop_assert_eq!(path.get(&doc), Some(&json!("x")));
    }
}

#[test]
fn roundtrip_of_documented_forms() {
    for text in ["name", "name[3]", "a.b[0].c", "disbursements[0].payees[0].amount"] {
        let parsed = Path::parse(text).unwrap();
        assert_eq!(parsed.to_string(), text);
        assert_eq!(Path::parse(&parsed.to_string()).unwrap(), parsed);
    }
}

#[test]
fn set_get_object_and_array_creation() {
    let mut doc = json!({"server": "live"});

    let object_path = Path::parse("meta.batch.id").unwrap();
    object_path.set(&mut doc, json!("B-1")).unwrap();
    assert_eq!(object_path.get(&doc), Some(&json!("B-1")));

    let array_path = Path::parse("rows[2].total").unwrap();
    array_path.set(&mut doc, json!(12.5)).unwrap();
    assert_eq!(array_path.get(&doc), Some(&json!(12.5)));
    assert_eq!(doc["rows"], json!([null, null, {"total": 12.5}]));
}
