//! Validating parse of persisted task records.
//!
//! Persisted data may come from older builds or be hand-edited, so every record
//! is re-checked field by field. A record either parses cleanly or is repaired
//! with fixed fallback values; loading never fails.

use serde_json::Value;
use uuid::Uuid;

use crate::models::{Task, Timestamp};

pub const FALLBACK_CATEGORY: &str = "general";

/// Which field of a record had to be replaced or coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    Id,
    Title,
    Completed,
    Important,
    CreatedAt,
    DueDate,
    Category,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Clean(Task),
    Repaired { task: Task, repairs: Vec<Repair> },
}

impl Normalized {
    pub fn task(&self) -> &Task {
        match self {
            Normalized::Clean(task) => task,
            Normalized::Repaired { task, .. } => task,
        }
    }

    pub fn into_task(self) -> Task {
        match self {
            Normalized::Clean(task) => task,
            Normalized::Repaired { task, .. } => task,
        }
    }

    pub fn repairs(&self) -> &[Repair] {
        match self {
            Normalized::Clean(_) => &[],
            Normalized::Repaired { repairs, .. } => repairs,
        }
    }
}

pub fn generate_task_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turns one loosely typed record into a well-formed task.
///
/// Non-object records behave like an empty object: every field falls back.
pub fn normalize_record(record: &Value, now: Timestamp) -> Normalized {
    let field = |name: &str| record.as_object().and_then(|map| map.get(name));
    let mut repairs = Vec::new();

    let id = match field("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(n)) => {
            repairs.push(Repair::Id);
            n.to_string()
        }
        _ => {
            repairs.push(Repair::Id);
            generate_task_id()
        }
    };

    let title = match field("title") {
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.len() != raw.len() {
                repairs.push(Repair::Title);
            }
            trimmed.to_string()
        }
        Some(Value::Number(n)) => {
            repairs.push(Repair::Title);
            n.to_string()
        }
        Some(Value::Bool(b)) => {
            repairs.push(Repair::Title);
            b.to_string()
        }
        _ => {
            repairs.push(Repair::Title);
            String::new()
        }
    };

    let completed = coerce_bool(field("completed"), Repair::Completed, &mut repairs);
    let is_important = coerce_bool(field("isImportant"), Repair::Important, &mut repairs);

    let created_at = match field("createdAt") {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(ms) => ms,
            None => {
                repairs.push(Repair::CreatedAt);
                n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64).unwrap_or(now)
            }
        },
        Some(Value::String(raw)) => {
            repairs.push(Repair::CreatedAt);
            raw.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64).unwrap_or(now)
        }
        _ => {
            repairs.push(Repair::CreatedAt);
            now
        }
    };

    let due_date = match field("dueDate") {
        Some(Value::String(raw)) => raw.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => {
            repairs.push(Repair::DueDate);
            if is_truthy(other) {
                match other {
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => String::new(),
                }
            } else {
                String::new()
            }
        }
    };

    let category = match field("category") {
        Some(Value::String(raw)) => raw.clone(),
        _ => {
            repairs.push(Repair::Category);
            FALLBACK_CATEGORY.to_string()
        }
    };

    let task = Task {
        id,
        title,
        completed,
        is_important,
        created_at,
        due_date,
        category,
    };
    if repairs.is_empty() {
        Normalized::Clean(task)
    } else {
        Normalized::Repaired { task, repairs }
    }
}

/// Parses the persisted task collection. Unparsable text or a non-array
/// document yields an empty collection.
pub fn parse_tasks(text: &str, now: Timestamp) -> Vec<Task> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => {
            log::warn!("task data is not valid json, starting empty: {error}");
            return Vec::new();
        }
    };
    let Value::Array(records) = value else {
        log::warn!("task data is not a list, starting empty");
        return Vec::new();
    };

    records
        .iter()
        .map(|record| {
            let normalized = normalize_record(record, now);
            if !normalized.repairs().is_empty() {
                log::debug!(
                    "repaired task record id={} repairs={:?}",
                    normalized.task().id,
                    normalized.repairs()
                );
            }
            normalized.into_task()
        })
        .collect()
}

pub fn serialize_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

fn coerce_bool(value: Option<&Value>, repair: Repair, repairs: &mut Vec<Repair>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        None => {
            repairs.push(repair);
            false
        }
        Some(other) => {
            repairs.push(repair);
            is_truthy(other)
        }
    }
}

/// Loose truthiness of a stored value: `null`, `false`, `0`, `NaN` and `""`
/// are false, everything else (including `"false"`, `[]` and `{}`) is true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
