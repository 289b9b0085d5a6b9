use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, is_table};

/// Write output as CSV to stdout.
///
/// A bare list of rows becomes one CSV table. Anything else is flattened to
/// `field,value` pairs; nested breakdown rows are written as
/// `field[i].column,value`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) if is_table(body) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record(["field", "value"]);
            for (path, val) in field_rows(body) {
                let _ = wtr.write_record([path.as_str(), val.as_str()]);
            }
        }
    }

    let _ = wtr.flush();
}

fn field_rows(value: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    flatten("", value, &mut fields);

    let mut rows = Vec::new();
    for (path, val) in fields {
        match val {
            Value::Array(items) if is_table(val) => {
                for (i, item) in items.iter().enumerate() {
                    for (sub, cell) in field_rows(item) {
                        rows.push((format!("{path}[{i}].{sub}"), cell));
                    }
                }
            }
            _ => rows.push((path, format_scalar(val))),
        }
    }
    rows
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_rows_get_indexed_paths() {
        let v = json!({
            "npl_balance_ratio": "2.5",
            "by_segment": [{"customer_segment": "Prime", "npl_ratio": "1.0"}]
        });
        let rows = field_rows(&v);
        assert!(rows.contains(&("npl_balance_ratio".into(), "2.5".into())));
        assert!(rows.contains(&("by_segment[0].customer_segment".into(), "Prime".into())));
    }
}
