//! Attribute 값 모델
//!
//! Registry에서 읽은 attribute 값을 표현하는 tagged union입니다.

use std::collections::BTreeMap;
use std::fmt;

/// Composite record - 이름 순으로 정렬된 필드 맵
pub type CompositeRecord = BTreeMap<String, AttributeValue>;

/// 개별 attribute 값
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// 숫자 (정수와 실수 모두 f64로 표현)
    Number(f64),
    /// 불리언
    Boolean(bool),
    /// 문자열
    String(String),
    /// Composite record (CompositeData)
    CompositeRecord(CompositeRecord),
    /// Composite record 배열 (CompositeData[])
    CompositeRecordArray(Vec<CompositeRecord>),
    /// Null
    Null,
    /// 지원되지 않는 값 (예: primitive가 아닌 객체 배열)
    Unsupported,
}

/// Variant tag of an [`AttributeValue`], used for dispatch and log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Boolean,
    String,
    CompositeRecord,
    CompositeRecordArray,
    Null,
    Unsupported,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Number => "Number",
            ValueKind::Boolean => "Boolean",
            ValueKind::String => "String",
            ValueKind::CompositeRecord => "CompositeRecord",
            ValueKind::CompositeRecordArray => "CompositeRecordArray",
            ValueKind::Null => "Null",
            ValueKind::Unsupported => "Unsupported",
        };
        f.write_str(name)
    }
}

impl AttributeValue {
    /// Variant tag
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Number(_) => ValueKind::Number,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::CompositeRecord(_) => ValueKind::CompositeRecord,
            AttributeValue::CompositeRecordArray(_) => ValueKind::CompositeRecordArray,
            AttributeValue::Null => ValueKind::Null,
            AttributeValue::Unsupported => ValueKind::Unsupported,
        }
    }

    /// 숫자 값 추출 (Boolean은 숫자로 취급하지 않음)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 문자열 값 추출
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 라벨 값으로 쓸 문자열 표현
    ///
    /// Integral numbers are rendered without a fractional part so that
    /// `3.0` becomes `"3"`.
    pub fn to_label_value(&self) -> Option<String> {
        match self {
            AttributeValue::String(s) => Some(s.clone()),
            AttributeValue::Boolean(b) => Some(b.to_string()),
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            AttributeValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::CompositeRecord(record) => write_record(f, record),
            AttributeValue::CompositeRecordArray(records) => {
                f.write_str("[")?;
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_record(f, record)?;
                }
                f.write_str("]")
            }
            AttributeValue::Null => f.write_str("null"),
            AttributeValue::Unsupported => f.write_str("<unsupported>"),
        }
    }
}

fn write_record(f: &mut fmt::Formatter<'_>, record: &CompositeRecord) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in record.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", key, value)?;
    }
    f.write_str("}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(AttributeValue::Number(1.0).kind(), ValueKind::Number);
        assert_eq!(
            AttributeValue::CompositeRecordArray(vec![]).kind(),
            ValueKind::CompositeRecordArray
        );
        assert_eq!(ValueKind::CompositeRecord.to_string(), "CompositeRecord");
    }

    #[test]
    fn test_to_label_value() {
        assert_eq!(
            AttributeValue::Number(3.0).to_label_value(),
            Some("3".to_string())
        );
        assert_eq!(
            AttributeValue::Number(1.5).to_label_value(),
            Some("1.5".to_string())
        );
        assert_eq!(
            AttributeValue::Boolean(true).to_label_value(),
            Some("true".to_string())
        );
        assert_eq!(AttributeValue::Null.to_label_value(), None);
    }

    #[test]
    fn test_display_composite() {
        let record = CompositeRecord::from([
            ("name".to_string(), AttributeValue::String("search".to_string())),
            ("active".to_string(), AttributeValue::Number(2.0)),
        ]);
        assert_eq!(
            AttributeValue::CompositeRecord(record).to_string(),
            "{active=2, name=search}"
        );
    }
}
