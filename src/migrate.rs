use crate::models::{SCHEMA_VERSION, TrackerKind, TrackerRecord};
use crate::trackers::TrackerSlice;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

pub fn migrate(user_id: &str, raw: Value) -> TrackerRecord {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            warn!(user_id, "record is not an object ({}), starting fresh", kind_of(&other));
            return TrackerRecord::new(user_id);
        }
    };

    let version = fields
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if version < u64::from(SCHEMA_VERSION) {
        debug!(user_id, version, "lifting legacy record");
        lift_legacy(&mut fields);
    }

    let mut record = TrackerRecord::new(user_id);
    for kind in TrackerKind::ALL {
        let Some(value) = fields.remove(kind.field_name()) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match TrackerSlice::parse(kind, value) {
            Ok(slice) => record.apply(slice),
            Err(err) => warn!(user_id, "{err}; using defaults"),
        }
    }
    record
}

fn lift_legacy(fields: &mut Map<String, Value>) {
    // Array-era finance data carried no accounts or budgets worth keeping.
    lift(fields, TrackerKind::FinanceTracker, |_| json!({}));
    lift(fields, TrackerKind::WaterIntake, |items| json!({ "dailyIntakes": items }));
    lift(fields, TrackerKind::ReadingTracker, |items| json!({ "readingSessions": items }));
}

fn lift(fields: &mut Map<String, Value>, kind: TrackerKind, wrap: fn(Vec<Value>) -> Value) {
    if let Some(Value::Array(items)) = fields.remove(kind.field_name()) {
        fields.insert(kind.field_name().to_string(), wrap(items));
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
