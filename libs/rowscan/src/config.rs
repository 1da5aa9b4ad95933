use serde::Deserialize;

/// Tag namespace used when none is configured.
pub const DEFAULT_TAG_NAME: &str = "pg";

/// `YYYY-MM-DD HH:MM:SS`, in chrono `strftime` syntax.
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Knobs for one scan call.
///
/// Can be embedded in a caller's config file; missing keys fall back to the
/// defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Which `#[tag(...)]` key maps fields to columns. Names that are not
    /// Rust identifiers are declared as strings: `#[tag("db-col" = "id")]`.
    pub tag: String,
    /// Layout for timestamps written into text fields.
    pub time_layout: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG_NAME.to_string(),
            time_layout: DEFAULT_TIME_LAYOUT.to_string(),
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }
}
