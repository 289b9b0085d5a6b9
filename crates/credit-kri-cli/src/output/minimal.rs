use serde_json::Value;

use super::format_scalar;

/// Key figure per command, looked up in order; the first present wins.
const PRIORITY_PATHS: [&str; 11] = [
    "npl_metrics.npl_balance_ratio",
    "npl_balance_ratio",
    "par30.ratio",
    "industry.hhi",
    "early_delinquency.ratio",
    "downgrade_rate",
    "status",
    "npl_ratio_max",
    "balance_pct",
    "npl_ratio",
    "total_balance",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_value(result_obj));
}

fn minimal_value(result: &Value) -> String {
    for path in &PRIORITY_PATHS {
        if let Some(val) = lookup(result, path) {
            if !val.is_null() {
                return format_scalar(val);
            }
        }
    }

    match result {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
            None => String::new(),
        },
        Value::Array(arr) => format!("{} rows", arr.len()),
        other => format_scalar(other),
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}
