use std::fmt::Display;

/// Identifies a record of any resource
///
/// Backends hand out both numeric and textual ids so both are accepted when
/// deserializing but the id is always kept (and sent) as text
#[derive(Debug, serde::Serialize, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum TextOrNumber {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match TextOrNumber::deserialize(deserializer)? {
            TextOrNumber::Text(s) => Self(s),
            TextOrNumber::Unsigned(n) => Self(n.to_string()),
            TextOrNumber::Signed(n) => Self(n.to_string()),
        })
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl From<&RecordId> for serde_json::Value {
    fn from(value: &RecordId) -> Self {
        serde_json::Value::String(value.0.clone())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
