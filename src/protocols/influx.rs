//! InfluxDB line protocol, the text form most collectors can emit.
//!
//! ```text
//! <name>[,<tag_key>=<tag_value>...] <field_key>=<field_value>[,...] [<timestamp_ns>]
//! ```
//!
//! Commas, spaces and equals signs in names, tag keys, tag values and field
//! keys may be escaped with a backslash. String field values are double
//! quoted and may contain `\"` and `\\`.

use chrono::{TimeZone, Utc};
use error::Error;
use metric::{FieldValue, Measurement};
use std::str::FromStr;

fn parse_error(line: &str, reason: &'static str) -> Error {
    Error::Parse {
        line: line.to_string(),
        reason: reason,
    }
}

/// Split `s` on every `sep` that is neither backslash-escaped nor, when
/// `quotes` is set, inside a double quoted string.
fn split_unescaped(s: &str, sep: char, quotes: bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    let mut in_quotes = false;
    for (idx, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if quotes && c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(&s[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split `s` at its first unescaped `=`.
fn split_pair(s: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' {
            return Some((&s[..idx], &s[idx + 1..]));
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(n) => out.push(n),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_field_value(val: &str) -> Option<FieldValue> {
    if val.starts_with('"') {
        if val.len() < 2 || !val.ends_with('"') {
            return None;
        }
        return Some(FieldValue::Str(unescape(&val[1..val.len() - 1])));
    }
    match val {
        "t" | "T" | "true" | "True" | "TRUE" => return Some(FieldValue::Bool(true)),
        "f" | "F" | "false" | "False" | "FALSE" => return Some(FieldValue::Bool(false)),
        _ => {}
    }
    if val.ends_with('i') {
        return i64::from_str(&val[..val.len() - 1]).ok().map(FieldValue::I64);
    }
    if val.ends_with('u') {
        return u64::from_str(&val[..val.len() - 1]).ok().map(FieldValue::UInt);
    }
    f64::from_str(val).ok().map(FieldValue::F64)
}

/// Parse a single line of line protocol.
///
/// Blank lines and `#` comments are `Ok(None)`. A line without a timestamp is
/// stamped with the current time.
pub fn parse_line(line: &str) -> Result<Option<Measurement>, Error> {
    let src = line.trim();
    if src.is_empty() || src.starts_with('#') {
        return Ok(None);
    }

    let sections = split_unescaped(src, ' ', true);
    if sections.len() < 2 || sections.len() > 3 || sections.iter().any(|s| s.is_empty()) {
        return Err(parse_error(line, "expected name, fields and optional timestamp"));
    }

    let mut series = split_unescaped(sections[0], ',', false).into_iter();
    let name = match series.next() {
        Some(n) if !n.is_empty() => unescape(n),
        _ => return Err(parse_error(line, "missing measurement name")),
    };
    let mut measurement = Measurement::new(name);
    for tag in series {
        match split_pair(tag) {
            Some((k, v)) if !k.is_empty() && !v.is_empty() => {
                measurement = measurement.overlay_tag(unescape(k), unescape(v));
            }
            _ => return Err(parse_error(line, "tags must be key=value")),
        }
    }

    for field in split_unescaped(sections[1], ',', true) {
        match split_pair(field) {
            Some((k, v)) if !k.is_empty() => match parse_field_value(v) {
                Some(val) => measurement = measurement.field(unescape(k), val),
                None => return Err(parse_error(line, "invalid field value")),
            },
            _ => return Err(parse_error(line, "fields must be key=value")),
        }
    }

    if let Some(ts) = sections.get(2) {
        match i64::from_str(ts) {
            Ok(ns) => measurement = measurement.time(Utc.timestamp_nanos(ns)),
            Err(_) => return Err(parse_error(line, "timestamp must be integer nanoseconds")),
        }
    }

    Ok(Some(measurement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let line = "cpu,host=server01,region=us-west usage_idle=97.5,cores=8i,up=true,\
                    serial=12u 1257894000000000000";
        let m = parse_line(line).unwrap().unwrap();

        assert_eq!("cpu", m.name());
        assert_eq!(Some(&"server01".to_string()), m.tags().get("host"));
        assert_eq!(Some(&"us-west".to_string()), m.tags().get("region"));
        assert_eq!(Some(&FieldValue::F64(97.5)), m.fields().get("usage_idle"));
        assert_eq!(Some(&FieldValue::I64(8)), m.fields().get("cores"));
        assert_eq!(Some(&FieldValue::Bool(true)), m.fields().get("up"));
        assert_eq!(Some(&FieldValue::UInt(12)), m.fields().get("serial"));
        assert_eq!(Utc.with_ymd_and_hms(2009, 11, 10, 23, 0, 0).unwrap(), m.timestamp());
    }

    #[test]
    fn test_parse_escapes_and_strings() {
        let line = r#"disk\ io,path=C:\\,mount\=point=a\,b msg="said \"hi\", twice",value=1 5"#;
        let m = parse_line(line).unwrap().unwrap();

        assert_eq!("disk io", m.name());
        assert_eq!(Some(&"C:\\".to_string()), m.tags().get("path"));
        assert_eq!(Some(&"a,b".to_string()), m.tags().get("mount=point"));
        assert_eq!(
            Some(&FieldValue::Str("said \"hi\", twice".into())),
            m.fields().get("msg")
        );
        assert_eq!(Some(&FieldValue::F64(1.0)), m.fields().get("value"));
        assert_eq!(Utc.timestamp_nanos(5), m.timestamp());
    }

    #[test]
    fn test_parse_no_timestamp() {
        let before = Utc::now();
        let m = parse_line("mem used=12i").unwrap().unwrap();
        assert!(m.timestamp() >= before);
        assert!(m.tags().is_empty());
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# cpu value=1").unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bad = vec![
            "cpu",
            "cpu value=1 12 extra",
            ",host=a value=1",
            "cpu,host value=1",
            "cpu value",
            "cpu value=abc",
            "cpu value=\"unterminated",
            "cpu value=1 notatime",
        ];
        for line in bad {
            match parse_line(line) {
                Err(Error::Parse { .. }) => {}
                other => panic!("{:?} should not parse, got {:?}", line, other),
            }
        }
    }
}
