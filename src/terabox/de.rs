//! 上游字段的宽松反序列化
//!
//! 上游接口里的数字字段有时是数字，有时是字符串

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

/// fs_id 等标识统一转成字符串
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Str(s)) => s,
        Some(StringOrNumber::Num(n)) => n.to_string(),
        None => String::new(),
    })
}

/// 支持字符串或数字类型的非负整数，缺失或 null 视为 0
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(StringOrNumber::Str(s)) if s.trim().is_empty() => Ok(0),
        Some(StringOrNumber::Str(s)) => s.trim().parse().map_err(Error::custom),
        Some(StringOrNumber::Num(n)) => n
            .as_u64()
            .ok_or_else(|| Error::custom(format!("不是非负整数: {}", n))),
    }
}

/// JSON 值的真假判断（null / false / 0 / "" 为假）
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
