//! Add-task body parsing.
//!
//! Numeric fields accept either JSON numbers or numeric strings, so form
//! posts that stringify everything still work. Anything missing or not
//! convertible is rejected before the store is touched.

use serde_json::{Map, Value};

use fieldgrid_state::{Coordinate, NewTask};

/// Parse an add-task body: `{title, description?, lat, lon, urgency}`.
pub fn parse_new_task(body: &Value) -> Result<NewTask, String> {
    let obj = body
        .as_object()
        .ok_or_else(|| "request body must be a JSON object".to_string())?;

    let title = match required(obj, "title")? {
        Value::String(s) => s.clone(),
        _ => return Err("title must be a string".to_string()),
    };

    let description = match obj.get("description") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err("description must be a string".to_string()),
    };

    let lat = float_field(obj, "lat")?;
    let lon = float_field(obj, "lon")?;
    let urgency = int_field(obj, "urgency")?;

    Ok(NewTask {
        title,
        description,
        location: Coordinate::new(lat, lon),
        urgency,
    })
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(format!("missing required field: {field}")),
        Some(v) => Ok(v),
    }
}

fn float_field(obj: &Map<String, Value>, field: &str) -> Result<f64, String> {
    let value = match required(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{field} must be a finite number"))
}

fn int_field(obj: &Map<String, Value>, field: &str) -> Result<i64, String> {
    let value = match required(obj, field)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    value.ok_or_else(|| format!("{field} must be an integer"))
}
