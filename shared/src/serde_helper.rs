//! 宽松反序列化辅助函数
//!
//! 服务端在不同版本中会把数值字段序列化为字符串（`"4"`、`"7.5"`），
//! 把 `date` 序列化为完整时间戳。这里统一做数值强转与日期截取。

use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

// =========================================================
// 数值
// =========================================================

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        v.trim()
            .parse::<f64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

fn to_u8<E: de::Error>(v: f64) -> Result<u8, E> {
    if v.fract() != 0.0 || !(0.0..=255.0).contains(&v) {
        return Err(E::custom(format!("expected a small integer, got {}", v)));
    }
    Ok(v as u8)
}

pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    d.deserialize_any(NumberVisitor)
}

pub fn lenient_u8<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    to_u8(d.deserialize_any(NumberVisitor)?)
}

/// `null`、缺省、空字符串与 `0` 都视为"未填写"
pub fn lenient_opt_u8<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    struct OptVisitor;

    impl<'de> Visitor<'de> for OptVisitor {
        type Value = Option<u8>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("null, a number or a numeric string")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            self.visit_f64(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            self.visit_f64(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v == 0.0 {
                Ok(None)
            } else {
                to_u8(v).map(Some)
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            if v.trim().is_empty() {
                return Ok(None);
            }
            self.visit_f64(NumberVisitor.visit_str::<E>(v)?)
        }
    }

    d.deserialize_any(OptVisitor)
}

// =========================================================
// 标识符
// =========================================================

/// 接受字符串或整数形式的 id
pub fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }
    }

    d.deserialize_any(IdVisitor)
}

// =========================================================
// 日期
// =========================================================

/// 解析 `YYYY-MM-DD` 或 RFC 3339 时间戳并取其日历日
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, crate::date::WIRE_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    // 非标准时间戳：截取前 10 个字符
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, crate::date::WIRE_DATE_FORMAT).ok())
}

pub fn calendar_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    struct DateVisitor;

    impl<'de> Visitor<'de> for DateVisitor {
        type Value = NaiveDate;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a YYYY-MM-DD date or an RFC 3339 timestamp")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<NaiveDate, E> {
            parse_calendar_date(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    d.deserialize_str(DateVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_calendar_date("2025-03-01"), expected);
        assert_eq!(parse_calendar_date("2025-03-01T23:10:00+00:00"), expected);
        assert_eq!(parse_calendar_date("2025-03-01 10:00:00"), expected);
        assert_eq!(parse_calendar_date("March 1st"), None);
    }

    #[derive(serde::Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_opt_u8")]
        severity: Option<u8>,
        #[serde(deserialize_with = "lenient_u8")]
        level: u8,
    }

    #[test]
    fn optional_severity_forms() {
        let p: Sample = serde_json::from_str(r#"{"severity":"3","level":2}"#).unwrap();
        assert_eq!((p.severity, p.level), (Some(3), 2));

        let p: Sample = serde_json::from_str(r#"{"severity":null,"level":"5"}"#).unwrap();
        assert_eq!((p.severity, p.level), (None, 5));

        let p: Sample = serde_json::from_str(r#"{"level":1}"#).unwrap();
        assert_eq!(p.severity, None);
    }

    #[test]
    fn fractional_level_is_rejected() {
        assert!(serde_json::from_str::<Sample>(r#"{"level":2.5}"#).is_err());
    }
}
