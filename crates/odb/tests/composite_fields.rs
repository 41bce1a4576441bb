mod fixtures;

use std::collections::BTreeMap;

use fixtures::{FakeDriver, Post};
use odb::prelude::*;

fn stored_value(call: &fixtures::Call, column_param: &str) -> String {
    match call.params.get(column_param) {
        Some(Value::Text(text)) => text.clone(),
        other => panic!("expected encoded text, got {other:?}"),
    }
}

#[test]
fn list_and_map_fields_are_stored_encoded() {
    let driver = FakeDriver::new().with_insert_id(1);
    let engine = Engine::new(&driver);

    let mut meta = BTreeMap::new();
    meta.insert("draft".to_string(), Value::Bool(false));
    meta.insert("views".to_string(), Value::Int(12));
    let mut post = Post {
        title: Some("Hello".into()),
        tags: Some(vec!["rust".into(), "sql".into()]),
        meta: Some(meta),
        ..Post::default()
    };
    assert!(post.save(&engine).unwrap());

    let call = driver.last_call();
    assert_eq!(
        call.sql,
        "INSERT INTO `posts` (`title`,`tags`,`meta`) VALUES (:val1,:val2,:val3)"
    );
    assert_eq!(stored_value(&call, "val1"), "Hello");
    assert_eq!(stored_value(&call, "val2"), r#"j:14:["rust","sql"];"#);
    assert!(odb::codec::is_encoded(&stored_value(&call, "val3")));
}

#[test]
fn encoded_columns_decode_back_into_fields() {
    let tags = Value::List(vec![Value::from("rust"), Value::from("sql")]);
    let mut meta = BTreeMap::new();
    meta.insert("views".to_string(), Value::Int(12));
    let meta = Value::Map(meta);

    let row = Row::new()
        .with("id", 5)
        .with("title", "Hello")
        .with("tags", odb::codec::serialize(tags).unwrap())
        .with("meta", odb::codec::serialize(meta.clone()).unwrap());
    let driver = FakeDriver::new().returning_rows(vec![row]);
    let engine = Engine::new(&driver);

    let post = Post::find(&engine, 5).unwrap().unwrap();
    assert_eq!(post.tags, Some(vec!["rust".to_string(), "sql".to_string()]));
    assert_eq!(post.meta.map(Value::Map), Some(meta));
}

#[test]
fn plain_text_that_resembles_an_envelope_stays_text() {
    let row = Row::new().with("id", 1).with("title", "j:5:[1,2];");
    let driver = FakeDriver::new().returning_rows(vec![row]);
    let engine = Engine::new(&driver);

    let post = Post::find(&engine, 1).unwrap().unwrap();
    assert_eq!(post.title.as_deref(), Some("j:5:[1,2];"));
}

#[test]
fn tagged_title_survives_save_and_load() {
    let driver = FakeDriver::new().with_insert_id(4);
    let engine = Engine::new(&driver);

    let mut post = Post {
        title: Some("j:2:[];".into()),
        ..Post::default()
    };
    assert!(post.save(&engine).unwrap());
    let stored = stored_value(&driver.last_call(), "val1");
    assert_eq!(stored, r#"j:9:"j:2:[];";"#);

    let row = Row::new().with("id", 4).with("title", stored);
    let driver = FakeDriver::new().returning_rows(vec![row]);
    let engine = Engine::new(&driver);
    let post = Post::find(&engine, 4).unwrap().unwrap();
    assert_eq!(post.title.as_deref(), Some("j:2:[];"));
}

#[test]
fn non_finite_float_in_map_field_is_rejected() {
    let driver = FakeDriver::new();
    let engine = Engine::new(&driver);

    let mut meta = BTreeMap::new();
    meta.insert("score".to_string(), Value::Float(f64::NAN));
    let mut post = Post {
        meta: Some(meta),
        ..Post::default()
    };
    assert!(matches!(post.save(&engine), Err(Error::Codec(_))));
    assert!(driver.calls().is_empty());
}

#[test]
fn envelope_json_matches_serde_json() {
    let encoded = odb::codec::serialize(Value::List(vec![Value::Int(1), Value::Null])).unwrap();
    let Value::Text(text) = encoded else {
        panic!("expected text");
    };
    let payload = text
        .strip_prefix("j:8:")
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(parsed, serde_json::json!([1, null]));
}

#[test]
fn malformed_envelope_in_list_field_is_a_type_error() {
    let row = Row::new().with("id", 1).with("tags", "not a list");
    let driver = FakeDriver::new().returning_rows(vec![row]);
    let engine = Engine::new(&driver);

    let err = Post::find(&engine, 1).unwrap_err();
    assert!(matches!(err, Error::Type(ref e) if e.column.as_deref() == Some("tags")));
}
