//! Decoding of postgres row values into positional JSON values.

use serde_json::Value as JsonValue;
use tokio_postgres::types::Type;
use tokio_postgres::Row;

use crate::error::{ExecError, Result};

/// Decode one row into positional JSON values aligned to its columns.
pub fn row_values(row: &Row) -> Result<Vec<JsonValue>> {
    let columns = row.columns();
    let mut values = Vec::with_capacity(columns.len());

    for (idx, col) in columns.iter().enumerate() {
        let ty = col.type_();
        let value = match *ty {
            Type::BOOL => row
                .try_get::<_, Option<bool>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            Type::INT8 => row
                .try_get::<_, Option<i64>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map(|f| json_float(f as f64)).unwrap_or(JsonValue::Null)),
            Type::FLOAT8 => row
                .try_get::<_, Option<f64>>(idx)
                .map(|v| v.map(json_float).unwrap_or(JsonValue::Null)),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
            Type::JSON | Type::JSONB => row
                .try_get::<_, Option<JsonValue>>(idx)
                .map(|v| v.unwrap_or(JsonValue::Null)),
            Type::TIMESTAMP => row
                .try_get::<_, Option<chrono::NaiveDateTime>>(idx)
                .map(|v| v.map(|t| JsonValue::from(t.to_string())).unwrap_or(JsonValue::Null)),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
                .map(|v| v.map(|t| JsonValue::from(t.to_rfc3339())).unwrap_or(JsonValue::Null)),
            Type::DATE => row
                .try_get::<_, Option<chrono::NaiveDate>>(idx)
                .map(|v| v.map(|d| JsonValue::from(d.to_string())).unwrap_or(JsonValue::Null)),
            Type::UUID => row
                .try_get::<_, Option<uuid::Uuid>>(idx)
                .map(|v| v.map(|u| JsonValue::from(u.to_string())).unwrap_or(JsonValue::Null)),
            // Last resort: ask the driver for a text decoding
            _ => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map(JsonValue::from).unwrap_or(JsonValue::Null)),
        }
        .map_err(|e| {
            ExecError::Query(format!(
                "Unsupported column type {} for column '{}': {}",
                ty,
                col.name(),
                e
            ))
        })?;
        values.push(value);
    }

    Ok(values)
}

/// JSON has no NaN/Infinity; those decode to null.
fn json_float(f: f64) -> JsonValue {
    serde_json::Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}
