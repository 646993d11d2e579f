use serde_json::{Map, Value};

/// A monitored region: ISO country code plus the display name used in
/// notifications and as the dedup cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub code: String,
    pub name: String,
}

impl Region {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// A single victim disclosure extracted from the feed.
///
/// Fields are pulled best-effort from the upstream JSON object: a field with
/// an unexpected JSON type is treated as absent rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VictimRecord {
    /// Upstream identifier, kept opaque. `Null` when the feed omits it.
    pub id: Value,
    pub post_title: Option<String>,
    pub activity: Option<String>,
    pub group_name: Option<String>,
    /// Disclosure timestamp as sent upstream (`YYYY-MM-DD HH:MM:SS[.ffffff]`)
    pub discovered: Option<String>,
    pub published: Option<String>,
    pub post_url: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    /// Either an object or an array of objects; see the formatter for how
    /// the leak size is read out of it.
    pub extrainfos: Option<Value>,
    pub duplicates: Vec<Value>,
}

impl VictimRecord {
    /// Build a record from a raw feed object.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: object.get("id").cloned().unwrap_or(Value::Null),
            post_title: text("post_title"),
            activity: text("activity"),
            group_name: text("group_name"),
            discovered: text("discovered"),
            published: text("published"),
            post_url: text("post_url"),
            website: text("website"),
            description: text("description"),
            extrainfos: object.get("extrainfos").filter(|v| !v.is_null()).cloned(),
            duplicates: object
                .get("duplicates")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }
}
