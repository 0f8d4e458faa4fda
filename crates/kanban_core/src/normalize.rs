//! Normalizer: the single trust boundary for untrusted task records.
//!
//! # Responsibility
//! - Turn arbitrary JSON (stored payloads, import files) into valid tasks.
//! - Deduplicate identifiers within one pass.
//!
//! # Invariants
//! - Output ids are pairwise distinct.
//! - Output order equals input order restricted to accepted records.
//! - Malformed input never produces an error; invalid records are dropped.
//! - Re-normalizing normalized output yields the same tasks.

use crate::model::task::{generate_task_id, Task, TaskId, TaskStatus, TaskValidationError};
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validates and coerces a single untrusted record.
///
/// # Errors
/// - [`TaskValidationError::NotARecord`] when `raw` is not a JSON object.
/// - [`TaskValidationError::EmptyTitle`] when `title` is missing, not text,
///   or blank after trimming.
pub fn validate_task(raw: &Value, now_ms: i64) -> Result<Task, TaskValidationError> {
    let record = raw.as_object().ok_or(TaskValidationError::NotARecord)?;

    let title = record
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if title.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    let status = record
        .get("status")
        .and_then(Value::as_str)
        .and_then(TaskStatus::parse)
        .unwrap_or_default();
    let description = record
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let created_at = coerce_timestamp(record.get("createdAt")).unwrap_or(now_ms);
    let updated_at = coerce_timestamp(record.get("updatedAt")).unwrap_or(created_at);

    Ok(Task {
        id: coerce_id(record).unwrap_or_else(|| generate_task_id(now_ms)),
        title: title.to_string(),
        description: description.to_string(),
        status,
        created_at,
        updated_at,
    })
}

/// Option view of [`validate_task`]: invalid records become `None`.
pub fn normalize_one(raw: &Value, now_ms: i64) -> Option<Task> {
    validate_task(raw, now_ms).ok()
}

/// Normalizes a batch. Non-array input yields an empty batch.
pub fn normalize_many(input: &Value, now_ms: i64) -> Vec<Task> {
    match input.as_array() {
        Some(records) => normalize_records(records, now_ms),
        None => Vec::new(),
    }
}

/// Normalizes a slice of untrusted records.
pub fn normalize_records(records: &[Value], now_ms: i64) -> Vec<Task> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(records.len());
    let mut tasks = Vec::with_capacity(records.len());
    let mut rejected = 0usize;
    let mut reassigned = 0usize;

    for raw in records {
        let Some(mut task) = normalize_one(raw, now_ms) else {
            rejected += 1;
            continue;
        };
        if seen.contains(&task.id) {
            task.id = fresh_id(&seen, now_ms);
            reassigned += 1;
        }
        seen.insert(task.id.clone());
        tasks.push(task);
    }

    if rejected > 0 || reassigned > 0 {
        debug!(
            "event=normalize module=normalize status=ok accepted={} rejected={} reassigned_ids={}",
            tasks.len(),
            rejected,
            reassigned
        );
    }
    tasks
}

/// Re-runs normalization over tasks that are already typed.
///
/// Callers may hand over collections assembled outside the normalizer, so
/// the same trust rules apply.
pub fn normalize_tasks(tasks: &[Task], now_ms: i64) -> Vec<Task> {
    let records: Vec<Value> = tasks
        .iter()
        .filter_map(|task| serde_json::to_value(task).ok())
        .collect();
    normalize_records(&records, now_ms)
}

/// Returns the task array of a document: a bare array, or the array-valued
/// `tasks` field of an object. Any other shape has no tasks source.
pub fn extract_tasks_source(document: &Value) -> Option<&Vec<Value>> {
    match document {
        Value::Array(records) => Some(records),
        Value::Object(map) => map.get("tasks").and_then(Value::as_array),
        _ => None,
    }
}

/// Generates an id that is not in `taken`.
pub(crate) fn fresh_id(taken: &HashSet<TaskId>, now_ms: i64) -> TaskId {
    loop {
        let candidate = generate_task_id(now_ms);
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

fn coerce_id(record: &Map<String, Value>) -> Option<TaskId> {
    record
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    let Value::Number(number) = value? else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    if number.is_u64() {
        return Some(i64::MAX);
    }
    number
        .as_f64()
        .filter(|float| float.is_finite())
        .map(|float| float.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::{coerce_timestamp, extract_tasks_source};
    use serde_json::json;

    #[test]
    fn coerce_timestamp_accepts_numbers_only() {
        assert_eq!(coerce_timestamp(Some(&json!(1700))), Some(1700));
        assert_eq!(coerce_timestamp(Some(&json!(1700.9))), Some(1700));
        assert_eq!(coerce_timestamp(Some(&json!("1700"))), None);
        assert_eq!(coerce_timestamp(Some(&json!(null))), None);
        assert_eq!(coerce_timestamp(None), None);
    }

    #[test]
    fn extract_accepts_bare_and_enveloped_documents() {
        let bare = json!([{ "title": "a" }]);
        let enveloped = json!({ "v": 1, "tasks": [{ "title": "a" }], "extra": true });
        assert_eq!(extract_tasks_source(&bare).map(Vec::len), Some(1));
        assert_eq!(extract_tasks_source(&enveloped).map(Vec::len), Some(1));
        assert!(extract_tasks_source(&json!({ "tasks": "nope" })).is_none());
        assert!(extract_tasks_source(&json!(42)).is_none());
    }
}
