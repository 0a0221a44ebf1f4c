//! Key identifiers and their translation to virtual-key codes.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{KeyError, Result};
use crate::vk::{self, VirtualKeyCode};

/// One base key of a [`KeyBonding`](crate::KeyBonding).
///
/// A `Char` is validated when it is resolved, not when it is built, so a
/// bonding may hold keys that will later be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// Raw platform code, passed through without range checks.
    Code(i64),
}

impl Key {
    /// Resolves this key to the code posted in the message's `WPARAM`.
    pub fn code(&self) -> Result<VirtualKeyCode> {
        resolve_key_code(self)
    }
}

/// Translates a key into a virtual-key code.
///
/// ASCII digits and letters map to the code of their uppercase form, so `'a'`
/// and `'A'` both give `0x41`. Integer codes are reinterpreted as the
/// unsigned `WPARAM` unchanged, negative values included.
pub fn resolve_key_code(key: &Key) -> Result<VirtualKeyCode> {
    match *key {
        Key::Char(c) if c.is_ascii_alphanumeric() => Ok(c.to_ascii_uppercase() as VirtualKeyCode),
        Key::Char(c) => Err(KeyError::InvalidCharacter(c)),
        Key::Code(n) => Ok(n as VirtualKeyCode),
    }
}

/// Decimal or `0x` hex, with an optional leading `-`. Signs and whitespace
/// anywhere else are rejected.
fn parse_integer(s: &str) -> Option<i64> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (digits, radix) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (unsigned, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl FromStr for Key {
    type Err = KeyError;

    /// A single character is a `Char` (so `"5"` is the digit key, not code 5).
    /// Decimal or `0x` hex integers and virtual-key names become `Code`.
    /// The input is taken verbatim; surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }

        if let Some(n) = parse_integer(s) {
            return Ok(Key::Code(n));
        }
        if let Some(code) = vk::code_for_name(s) {
            return Ok(Key::Code(code as i64));
        }

        Err(KeyError::invalid_key_type(format!("unrecognised key {s:?}")))
    }
}

impl TryFrom<&Value> for Key {
    type Error = KeyError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => s.parse(),
            Value::Number(n) => match n.as_i64() {
                Some(code) => Ok(Key::Code(code)),
                None if n.is_u64() => Err(KeyError::invalid_key_type(format!(
                    "integer {n} out of range"
                ))),
                None => Err(KeyError::invalid_key_type(format!("non-integer number {n}"))),
            },
            Value::Null => Err(KeyError::invalid_key_type("null")),
            Value::Bool(b) => Err(KeyError::invalid_key_type(format!("boolean {b}"))),
            Value::Array(_) => Err(KeyError::invalid_key_type("array")),
            Value::Object(_) => Err(KeyError::invalid_key_type("object")),
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Char(c)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Code(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Code(i64::from(n))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c:?}"),
            Key::Code(n) => match usize::try_from(*n).ok().and_then(vk::name_for_code) {
                Some(name) => write!(f, "{name} ({n:#04x})"),
                None => write!(f, "code {n}"),
            },
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Key::Char(c) => serializer.serialize_char(*c),
            Key::Code(n) => serializer.serialize_i64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Key::try_from(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_letters_and_digits_resolve_case_insensitively() {
        for c in ('0'..='9').chain('a'..='z').chain('A'..='Z') {
            let lower = resolve_key_code(&Key::Char(c)).unwrap();
            let upper = resolve_key_code(&Key::Char(c.to_ascii_uppercase())).unwrap();
            assert_eq!(lower, upper);
            assert_eq!(upper, c.to_ascii_uppercase() as usize);
        }
    }

    #[test]
    fn test_other_characters_are_rejected() {
        for c in [' ', '#', '-', '\n', 'é', 'ß', '٣'] {
            let result = resolve_key_code(&Key::Char(c));
            assert!(matches!(result, Err(KeyError::InvalidCharacter(bad)) if bad == c));
        }
    }

    #[test]
    fn test_codes_pass_through_unchecked() {
        assert_eq!(resolve_key_code(&Key::Code(5)).unwrap(), 5);
        assert_eq!(resolve_key_code(&Key::Code(0x1234)).unwrap(), 0x1234);
        assert_eq!(resolve_key_code(&Key::Code(-1)).unwrap(), usize::MAX);
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("a".parse::<Key>().unwrap(), Key::Char('a'));
        assert_eq!("5".parse::<Key>().unwrap(), Key::Char('5'));
        assert_eq!("#".parse::<Key>().unwrap(), Key::Char('#'));
        assert_eq!("13".parse::<Key>().unwrap(), Key::Code(13));
        assert_eq!("0x70".parse::<Key>().unwrap(), Key::Code(0x70));
        assert_eq!("-3".parse::<Key>().unwrap(), Key::Code(-3));
        assert_eq!("F5".parse::<Key>().unwrap(), Key::Code(0x74));
        assert_eq!("space".parse::<Key>().unwrap(), Key::Code(0x20));

        assert!(matches!("".parse::<Key>(), Err(KeyError::InvalidKeyType(_))));
        assert!(matches!("0xzz".parse::<Key>(), Err(KeyError::InvalidKeyType(_))));
        assert!(matches!("banana".parse::<Key>(), Err(KeyError::InvalidKeyType(_))));
    }

    #[test]
    fn test_parse_rejects_misplaced_signs_and_whitespace() {
        assert_eq!("-0x10".parse::<Key>().unwrap(), Key::Code(-16));
        assert_eq!("0XfF".parse::<Key>().unwrap(), Key::Code(0xFF));

        for bad in [
            "0x-5", "-0x-5", "0x+41", "+13", "--5", "0x", "1 3", " a", " 13", "f1 ", "0x 10",
        ] {
            assert!(
                matches!(bad.parse::<Key>(), Err(KeyError::InvalidKeyType(_))),
                "{bad:?} should be rejected"
            );
        }

        // A lone space is still a character key.
        assert_eq!(" ".parse::<Key>().unwrap(), Key::Char(' '));
    }

    #[test]
    fn test_json_values() {
        assert_eq!(Key::try_from(&json!("q")).unwrap(), Key::Char('q'));
        assert_eq!(Key::try_from(&json!(5)).unwrap(), Key::Code(5));
        assert_eq!(Key::try_from(&json!("enter")).unwrap(), Key::Code(0x0D));

        for bad in [json!(null), json!(true), json!(1.5), json!([1]), json!({"k": 1})] {
            assert!(matches!(Key::try_from(&bad), Err(KeyError::InvalidKeyType(_))));
        }
    }

    #[test]
    fn test_json_integer_out_of_range() {
        let err = Key::try_from(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, KeyError::InvalidKeyType(_)));
        assert!(err.to_string().contains("out of range"));

        let err = Key::try_from(&json!(2.5)).unwrap_err();
        assert!(err.to_string().contains("non-integer"));

        assert_eq!(Key::try_from(&json!(i64::MIN)).unwrap(), Key::Code(i64::MIN));
    }

    #[test]
    fn test_serde_shape() {
        let keys: Vec<Key> = serde_json::from_str(r#"["a", 65, "tab"]"#).unwrap();
        assert_eq!(keys, vec![Key::Char('a'), Key::Code(65), Key::Code(0x09)]);
        assert_eq!(serde_json::to_string(&keys).unwrap(), r#"["a",65,9]"#);

        assert!(serde_json::from_str::<Key>("false").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::Char('a').to_string(), "'a'");
        assert_eq!(Key::Code(0x10).to_string(), "shift (0x10)");
        assert_eq!(Key::Code(-7).to_string(), "code -7");
    }
}
