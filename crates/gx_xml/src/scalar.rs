//! Text encodings of inline values.

use alloc::string::{String, ToString};

use chrono::NaiveDateTime;
use gx_reflect::descriptor::PrimitiveKind;
use gx_reflect::value::{Color, PointF, Value};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Formats an inline value. Returns `None` for null, enums and objects.
pub(crate) fn format(value: &Value) -> Option<String> {
    Some(match value {
        Value::Bool(v) => String::from(if *v { "true" } else { "false" }),
        Value::Char(v) => v.to_string(),
        Value::I8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U8(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
        Value::Color(v) => alloc::format!("#{:08X}", v.to_argb()),
        Value::Point(v) => alloc::format!("{},{}", v.x, v.y),
        Value::Null | Value::Enum(_) | Value::Object(_) => return None,
    })
}

pub(crate) fn parse_primitive(kind: PrimitiveKind, raw: &str) -> Option<Value> {
    let text = raw.trim();
    Some(match kind {
        PrimitiveKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                return None;
            }
        }
        PrimitiveKind::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Value::Char(ch),
                _ => return None,
            }
        }
        PrimitiveKind::I8 => Value::I8(text.parse().ok()?),
        PrimitiveKind::I16 => Value::I16(text.parse().ok()?),
        PrimitiveKind::I32 => Value::I32(text.parse().ok()?),
        PrimitiveKind::I64 => Value::I64(text.parse().ok()?),
        PrimitiveKind::U8 => Value::U8(text.parse().ok()?),
        PrimitiveKind::U16 => Value::U16(text.parse().ok()?),
        PrimitiveKind::U32 => Value::U32(text.parse().ok()?),
        PrimitiveKind::U64 => Value::U64(text.parse().ok()?),
        PrimitiveKind::F32 => Value::F32(text.parse().ok()?),
        PrimitiveKind::F64 => Value::F64(text.parse().ok()?),
    })
}

pub(crate) fn parse_date_time(text: &str) -> Option<Value> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_TIME_FORMAT)
        .ok()
        .map(Value::DateTime)
}

pub(crate) fn parse_color(text: &str) -> Option<Value> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .map(|argb| Value::Color(Color::from_argb(argb)))
}

pub(crate) fn parse_point(text: &str) -> Option<Value> {
    let (x, y) = text.split_once(',')?;
    Some(Value::Point(PointF::new(
        x.trim().parse().ok()?,
        y.trim().parse().ok()?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bool_is_case_insensitive() {
        assert_eq!(format(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(parse_primitive(PrimitiveKind::Bool, "True"), Some(Value::Bool(true)));
        assert_eq!(parse_primitive(PrimitiveKind::Bool, "FALSE"), Some(Value::Bool(false)));
        assert_eq!(parse_primitive(PrimitiveKind::Bool, "yes"), None);
    }

    #[test]
    fn numbers_keep_their_width() {
        assert_eq!(parse_primitive(PrimitiveKind::U8, "256"), None);
        assert_eq!(parse_primitive(PrimitiveKind::I64, "-9000000000"), Some(Value::I64(-9_000_000_000)));
        assert_eq!(format(&Value::F64(0.1)).as_deref(), Some("0.1"));
        assert_eq!(parse_primitive(PrimitiveKind::F64, "0.1"), Some(Value::F64(0.1)));
        assert_eq!(parse_primitive(PrimitiveKind::Char, "ab"), None);
        assert_eq!(parse_primitive(PrimitiveKind::Char, " "), Some(Value::Char(' ')));
    }

    #[test]
    fn date_time_keeps_fraction() {
        let value = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(13, 5, 9, 250)
            .unwrap();
        let text = format(&Value::DateTime(value)).unwrap();
        assert_eq!(text, "2024-02-29T13:05:09.250");
        assert_eq!(parse_date_time(&text), Some(Value::DateTime(value)));

        let whole = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format(&Value::DateTime(whole)).as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(parse_date_time("2024-01-01T00:00:00"), Some(Value::DateTime(whole)));
    }

    #[test]
    fn color_and_point() {
        let color = Value::Color(Color::argb(0x80, 0x12, 0xAB, 0x00));
        assert_eq!(format(&color).as_deref(), Some("#8012AB00"));
        assert_eq!(parse_color("#8012ab00"), Some(color));
        assert_eq!(parse_color("8012AB00"), None);

        let point = Value::Point(PointF::new(1.5, -2.0));
        assert_eq!(format(&point).as_deref(), Some("1.5,-2"));
        assert_eq!(parse_point("1.5, -2"), Some(point));
    }
}
