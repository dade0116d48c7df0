/// One line of a hosts file
///
/// Every variant keeps the line's original bytes so that rendering an
/// untouched document reproduces it exactly, whatever its encoding.
/// Classification and field splitting work on a lossy UTF-8 view of
/// those bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostsLine {
    /// Empty or whitespace-only
    Blank(Vec<u8>),
    /// First non-blank character is `#`
    Comment(Vec<u8>),
    /// Fewer than two whitespace-separated fields
    Malformed(Vec<u8>),
    /// `<address> <hostname> [<hostname>...]`
    Entry {
        raw: Vec<u8>,
        address: String,
        /// Every field after the address, including any trailing
        /// comment fields
        hostnames: Vec<String>,
    },
}

impl HostsLine {
    /// Classify a single line (without its terminating `\n`)
    pub fn parse(raw: &str) -> Self {
        Self::from_bytes(raw.as_bytes())
    }

    /// Classify a single line given as raw bytes
    pub fn from_bytes(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Blank(raw.to_vec());
        }
        if trimmed.starts_with('#') {
            return Self::Comment(raw.to_vec());
        }

        let mut fields = trimmed.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(address), Some(first)) => Self::Entry {
                raw: raw.to_vec(),
                address: address.to_string(),
                hostnames: std::iter::once(first)
                    .chain(fields)
                    .map(str::to_string)
                    .collect(),
            },
            _ => Self::Malformed(raw.to_vec()),
        }
    }

    /// Original bytes of the line
    pub fn raw(&self) -> &[u8] {
        match self {
            Self::Blank(raw) | Self::Comment(raw) | Self::Malformed(raw) => raw,
            Self::Entry { raw, .. } => raw,
        }
    }

    /// Whether this is an entry line listing `hostname` among its fields
    pub fn names_host(&self, hostname: &str) -> bool {
        match self {
            Self::Entry { hostnames, .. } => hostnames.iter().any(|h| h == hostname),
            _ => false,
        }
    }
}
