use std::path::Path;

/// Public Suffix List source format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// The publicsuffix.org text format
    Text,
    /// A JSON snapshot of structured rule data
    Json,
}

impl ListFormat {
    /// Detect format from file extension
    pub fn detect(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "dat" | "txt" => Some(ListFormat::Text),
            "json" => Some(ListFormat::Json),
            _ => None,
        }
    }

    /// Get default filename for this format
    pub fn default_filename(&self) -> &'static str {
        match self {
            ListFormat::Text => "public_suffix_list.dat",
            ListFormat::Json => "public_suffix_list.json",
        }
    }
}

/// Default filename of the IANA root zone list
pub const DEFAULT_TLD_FILENAME: &str = "tlds-alpha-by-domain.txt";
