use serde_json::Value;
use std::io::{self, Write};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

/// Envelopes become `field,value` pairs of their result; arrays of objects
/// become one row per element with headers from the first element.
fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            wtr.write_record(["field", "value"])?;
            for (key, val) in fields {
                wtr.write_record([key.as_str(), &format_csv_value(val)])?;
            }
        }
        Value::Array(arr) => match arr.first() {
            Some(Value::Object(first)) => {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                wtr.write_record(&headers)?;
                for map in arr.iter().filter_map(Value::as_object) {
                    let row: Vec<String> = headers
                        .iter()
                        .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                        .collect();
                    wtr.write_record(&row)?;
                }
            }
            _ => {
                for item in arr {
                    wtr.write_record([format_csv_value(item)])?;
                }
            }
        },
        _ => wtr.write_record([format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_envelope_writes_result_fields() {
        let value = json!({
            "result": { "total_mdr": "654000" },
            "methodology": "ignored",
        });
        assert_eq!(render(&value), "field,value\ntotal_mdr,654000\n");
    }

    #[test]
    fn test_rows_take_headers_from_first_element() {
        let value = json!([
            { "label": "Estimated Annual Savings", "value": "$0" },
            { "label": "ROI", "value": "0%" },
        ]);
        assert_eq!(
            render(&value),
            "label,value\nEstimated Annual Savings,$0\nROI,0%\n"
        );
    }
}
