use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// SQL bindable value enum
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Null,
}

/// SQL update container
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build a dynamic UPDATE from a JSON object, column names restricted to
/// `allowed`. Keys become `SET` columns in payload order; string values are
/// sniffed for date/time/datetime shapes so callers can send "2026-03-02"
/// or "08:15:00" without a custom DTO per table.
pub fn build_update_sql(
    table: &str,
    allowed: &[&str],
    payload: &Value,
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(bad) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Unknown column: {}", bad)));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        values.push(to_sql_value(value)?);
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

fn to_sql_value(value: &Value) -> Result<SqlValue, actix_web::Error> {
    match value {
        Value::String(s) => {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(SqlValue::Date(d))
            } else if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
                Ok(SqlValue::Time(t))
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                Ok(SqlValue::DateTime(dt))
            } else {
                Ok(SqlValue::String(s.clone()))
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::I64(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::F64(f))
            } else {
                Err(ErrorBadRequest("Unsupported numeric value"))
            }
        }
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Null => Ok(SqlValue::Null),
        _ => Err(ErrorBadRequest("Unsupported JSON value type")),
    }
}

/// Execute the update
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Time(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLS: &[&str] = &["status", "notes", "check_in", "date"];

    #[test]
    fn builds_update_with_bound_id_last() {
        let payload = json!({"status": "absent"});
        let update = build_update_sql("attendance_records", COLS, &payload, "id", 9).unwrap();

        assert_eq!(
            update.sql,
            "UPDATE attendance_records SET status = ? WHERE id = ?"
        );
        assert_eq!(
            update.values,
            vec![SqlValue::String("absent".into()), SqlValue::I64(9)]
        );
    }

    #[test]
    fn sniffs_dates_and_times_out_of_strings() {
        let payload = json!({"date": "2026-03-02", "check_in": "08:15:00"});
        let update = build_update_sql("attendance_records", COLS, &payload, "id", 1).unwrap();

        assert!(update
            .values
            .contains(&SqlValue::Date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())));
        assert!(update
            .values
            .contains(&SqlValue::Time(NaiveTime::from_hms_opt(8, 15, 0).unwrap())));
    }

    #[test]
    fn null_clears_a_column() {
        let payload = json!({"notes": null});
        let update = build_update_sql("attendance_records", COLS, &payload, "id", 1).unwrap();
        assert_eq!(update.values[0], SqlValue::Null);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let payload = json!({"status": "absent", "intern_id": 99});
        assert!(build_update_sql("attendance_records", COLS, &payload, "id", 1).is_err());
    }

    #[test]
    fn empty_and_non_object_payloads_are_rejected() {
        assert!(build_update_sql("attendance_records", COLS, &json!({}), "id", 1).is_err());
        assert!(build_update_sql("attendance_records", COLS, &json!([1, 2]), "id", 1).is_err());
    }
}
