use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Value of a single flag before it is flattened into argv tokens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Null,
}

impl FlagValue {
    /// Loose truthiness used for non-boolean values: empty text, zero, NaN
    /// and null are all falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Integer(n) => *n != 0,
            FlagValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FlagValue::Text(s) => !s.is_empty(),
            FlagValue::Null => false,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Integer(n) => write!(f, "{}", n),
            FlagValue::Number(n) => f.write_str(&format_number(*n)),
            FlagValue::Text(s) => f.write_str(s),
            FlagValue::Null => f.write_str("null"),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Bool(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Text(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        FlagValue::Text(s)
    }
}

impl From<f64> for FlagValue {
    fn from(n: f64) -> Self {
        FlagValue::Number(n)
    }
}

impl From<i32> for FlagValue {
    fn from(n: i32) -> Self {
        FlagValue::Integer(n.into())
    }
}

impl From<u32> for FlagValue {
    fn from(n: u32) -> Self {
        FlagValue::Integer(n.into())
    }
}

impl From<i64> for FlagValue {
    fn from(n: i64) -> Self {
        FlagValue::Integer(n)
    }
}

impl<T: Into<FlagValue>> From<Option<T>> for FlagValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FlagValue::Null)
    }
}

/// Renders a float the way a command line usually expects it: integral
/// values without a fraction, exponent form below 1e-6 and from 1e21 up.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = n.abs();
    if abs != 0.0 && (abs >= 1e21 || abs < 1e-6) {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        format!("{}", n)
    }
}

/// Flag name to value mapping, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagMapping {
    entries: Vec<(String, FlagValue)>,
}

impl FlagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn flag(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a flag. Replacing keeps the original position;
    /// empty names are ignored.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FlagValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FlagMapping
where
    K: Into<String>,
    V: Into<FlagValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = FlagMapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl<'de> Deserialize<'de> for FlagMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = FlagMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of flag names to string, number, boolean or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FlagMapping, A::Error> {
                let mut mapping = FlagMapping::new();
                while let Some((name, value)) = access.next_entry::<String, FlagValue>()? {
                    if name.is_empty() {
                        return Err(de::Error::custom("flag names must not be empty"));
                    }
                    mapping.insert(name, value);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Element of a sequence item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SequenceElement {
    Arg(String),
    Flags(FlagMapping),
    /// Anything else found in untyped input; skipped when formatting.
    Ignored(serde_json::Value),
}

impl From<&str> for SequenceElement {
    fn from(s: &str) -> Self {
        SequenceElement::Arg(s.to_string())
    }
}

impl From<String> for SequenceElement {
    fn from(s: String) -> Self {
        SequenceElement::Arg(s)
    }
}

impl From<FlagMapping> for SequenceElement {
    fn from(m: FlagMapping) -> Self {
        SequenceElement::Flags(m)
    }
}

/// One positional option passed to `build` or `exec`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionItem {
    Arg(String),
    Sequence(Vec<SequenceElement>),
    Flags(FlagMapping),
    /// Anything else found in untyped input; skipped when formatting.
    Ignored(serde_json::Value),
}

impl OptionItem {
    pub fn sequence<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<SequenceElement>,
    {
        OptionItem::Sequence(elements.into_iter().map(Into::into).collect())
    }

    /// Parses a command-line word: JSON objects and arrays become flag
    /// mappings and sequences. `{}` and words that are not valid JSON stay
    /// plain arguments.
    pub fn parse_word(word: &str) -> Self {
        let trimmed = word.trim();
        if trimmed != "{}" && (trimmed.starts_with('{') || trimmed.starts_with('[')) {
            if let Ok(item) = serde_json::from_str(trimmed) {
                return item;
            }
        }
        OptionItem::Arg(word.to_string())
    }
}

impl From<&str> for OptionItem {
    fn from(s: &str) -> Self {
        OptionItem::Arg(s.to_string())
    }
}

impl From<String> for OptionItem {
    fn from(s: String) -> Self {
        OptionItem::Arg(s)
    }
}

impl From<FlagMapping> for OptionItem {
    fn from(m: FlagMapping) -> Self {
        OptionItem::Flags(m)
    }
}

impl From<Vec<SequenceElement>> for OptionItem {
    fn from(v: Vec<SequenceElement>) -> Self {
        OptionItem::Sequence(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(FlagValue::from("x").is_truthy());
        assert!(!FlagValue::from("").is_truthy());
        assert!(FlagValue::from(3).is_truthy());
        assert!(!FlagValue::from(0).is_truthy());
        assert!(!FlagValue::Number(f64::NAN).is_truthy());
        assert!(!FlagValue::Null.is_truthy());
        assert!(FlagValue::from(true).is_true());
        assert!(!FlagValue::from("true").is_true());
    }

    #[test]
    fn test_number_text_form() {
        assert_eq!(FlagValue::from(10).to_string(), "10");
        assert_eq!(FlagValue::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let m = FlagMapping::new().flag("z", true).flag("a", "1").flag("m", 2);
        let keys: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_mapping_replace_and_remove() {
        let mut m = FlagMapping::new().flag("a", true).flag("b", true);
        m.insert("a", "x");
        m.insert("", true);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a"), Some(&FlagValue::from("x")));
        assert_eq!(m.remove("a"), Some(FlagValue::from("x")));
        assert_eq!(m.remove("a"), None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_deserialize_mapping_preserves_order() {
        let m: FlagMapping = serde_json::from_str(r#"{"zeta": 1, "alpha": true, "mid": null}"#).unwrap();
        let keys: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(m.get("mid"), Some(&FlagValue::Null));
    }

    #[test]
    fn test_deserialize_items() {
        let items: Vec<OptionItem> =
            serde_json::from_str(r#"["run", {"rm": true}, ["a", {"h": true}, 5], 42]"#).unwrap();
        assert_eq!(items[0], OptionItem::from("run"));
        assert_eq!(items[1], OptionItem::from(FlagMapping::new().flag("rm", true)));
        match &items[2] {
            OptionItem::Sequence(elements) => {
                assert_eq!(elements.len(), 3);
                assert!(matches!(elements[2], SequenceElement::Ignored(_)));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
        assert!(matches!(items[3], OptionItem::Ignored(_)));
    }

    #[test]
    fn test_parse_word() {
        assert_eq!(OptionItem::parse_word("install"), OptionItem::from("install"));
        assert_eq!(
            OptionItem::parse_word(r#"{"save-dev": true}"#),
            OptionItem::from(FlagMapping::new().flag("save-dev", true))
        );
        assert!(matches!(OptionItem::parse_word(r#"["a"]"#), OptionItem::Sequence(_)));
    }

    #[test]
    fn test_parse_word_keeps_non_json_words() {
        assert_eq!(OptionItem::parse_word("{}"), OptionItem::from("{}"));
        assert_eq!(OptionItem::parse_word("{not json"), OptionItem::from("{not json"));
        assert_eq!(
            OptionItem::parse_word("[ -f x ] && echo y"),
            OptionItem::from("[ -f x ] && echo y")
        );
    }

    #[test]
    fn test_large_integers_keep_precision() {
        let m: FlagMapping = serde_json::from_str(r#"{"id": 9007199254740993}"#).unwrap();
        assert_eq!(m.get("id"), Some(&FlagValue::Integer(9007199254740993)));
        assert_eq!(m.get("id").unwrap().to_string(), "9007199254740993");
    }

    #[test]
    fn test_float_text_form() {
        assert_eq!(FlagValue::from(1e21).to_string(), "1e+21");
        assert_eq!(FlagValue::from(1.5e22).to_string(), "1.5e+22");
        assert_eq!(FlagValue::from(1e-7).to_string(), "1e-7");
        assert_eq!(FlagValue::from(2.0).to_string(), "2");
        assert_eq!(FlagValue::from(f64::INFINITY).to_string(), "Infinity");
    }
}
