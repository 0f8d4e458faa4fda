use kanban_core::{normalize_many, normalize_one, validate_task, TaskStatus, TaskValidationError};
use serde_json::{json, Value};
use std::collections::HashSet;

const NOW: i64 = 1_700_000_000_000;

fn messy_batch() -> Value {
    json!([
        { "id": "a", "title": "Buy milk", "status": "done", "createdAt": 10, "updatedAt": 20 },
        { "id": "a", "title": "Duplicate", "status": "archived" },
        { "title": "   " },
        "not a record",
        null,
        { "id": "  ", "title": "  Generated id  ", "description": 5 },
        { "title": "No id either", "createdAt": "yesterday", "updatedAt": 99.9 },
        [1, 2, 3]
    ])
}

#[test]
fn normalization_is_idempotent() {
    let first = normalize_many(&messy_batch(), NOW);
    let second = normalize_many(&serde_json::to_value(&first).unwrap(), NOW + 5_000);
    assert_eq!(second, first);
}

#[test]
fn normalized_ids_are_unique() {
    let mut records: Vec<Value> = (0..50)
        .map(|n| json!({ "id": format!("id-{}", n % 7), "title": format!("task {n}") }))
        .collect();
    records.extend((0..50).map(|n| json!({ "title": format!("anon {n}") })));

    let tasks = normalize_many(&Value::Array(records), NOW);
    assert_eq!(tasks.len(), 100);
    let ids: HashSet<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids.len(), tasks.len());
}

#[test]
fn blank_titles_are_dropped_and_real_titles_kept() {
    let tasks = normalize_many(
        &json!([
            { "title": "" },
            { "title": "   " },
            { "title": 42 },
            { "title": "Buy milk" }
        ]),
        NOW,
    );
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");

    assert_eq!(
        validate_task(&json!({ "title": "  " }), NOW).unwrap_err(),
        TaskValidationError::EmptyTitle
    );
    assert_eq!(
        validate_task(&json!(["title"]), NOW).unwrap_err(),
        TaskValidationError::NotARecord
    );
}

#[test]
fn unknown_status_clamps_to_todo() {
    let archived = normalize_one(&json!({ "title": "X", "status": "archived" }), NOW).unwrap();
    assert_eq!(archived.status, TaskStatus::Todo);

    let done = normalize_one(&json!({ "title": "X", "status": "done" }), NOW).unwrap();
    assert_eq!(done.status, TaskStatus::Done);

    let missing = normalize_one(&json!({ "title": "X", "status": 3 }), NOW).unwrap();
    assert_eq!(missing.status, TaskStatus::Todo);
}

#[test]
fn defaults_are_derived_for_missing_fields() {
    let task = normalize_one(&json!({ "id": "  keep-me ", "title": "  Trim me  " }), NOW).unwrap();
    assert_eq!(task.id, "keep-me");
    assert_eq!(task.title, "Trim me");
    assert_eq!(task.description, "");
    assert_eq!(task.created_at, NOW);
    assert_eq!(task.updated_at, NOW);

    let derived = normalize_one(&json!({ "title": "X", "createdAt": 5 }), NOW).unwrap();
    assert_eq!(derived.created_at, 5);
    assert_eq!(derived.updated_at, 5);
    assert!(derived.id.starts_with("t_"));
}

#[test]
fn description_is_kept_verbatim() {
    let task = normalize_one(&json!({ "title": "X", "description": "  spaced  " }), NOW).unwrap();
    assert_eq!(task.description, "  spaced  ");
}

#[test]
fn later_duplicate_gets_new_id_and_order_is_stable() {
    let tasks = normalize_many(&messy_batch(), NOW);
    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Buy milk", "Duplicate", "Generated id", "No id either"]
    );
    assert_eq!(tasks[0].id, "a");
    assert_ne!(tasks[1].id, "a");
    assert_eq!(tasks[3].created_at, NOW);
    assert_eq!(tasks[3].updated_at, 99);
}

#[test]
fn non_list_input_yields_nothing() {
    assert!(normalize_many(&json!({ "tasks": [{ "title": "X" }] }), NOW).is_empty());
    assert!(normalize_many(&json!("text"), NOW).is_empty());
    assert!(normalize_many(&Value::Null, NOW).is_empty());
}
