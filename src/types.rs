use serde::{Deserialize, Serialize};

/// Whether to compose a new email or polish an existing one
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Compose a new email from a free-form description
    Write,
    /// Polish an existing email body
    #[default]
    Rewrite,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Write => "write",
            Mode::Rewrite => "rewrite",
        }
    }

    /// Parse a mode name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "write" => Some(Mode::Write),
            "rewrite" => Some(Mode::Rewrite),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation call as received from a caller
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub input_text: String,
    pub tone: String,
    pub mode: Mode,
    pub persist: bool,
}

/// Output of a successful generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub output_text: String,
    /// Canonical name of the resolved tone
    pub tone: String,
    /// Local time of generation, formatted with `TIMESTAMP_FORMAT`
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_default() {
        assert_eq!(Mode::parse("WRITE"), Some(Mode::Write));
        assert_eq!(Mode::parse(" rewrite "), Some(Mode::Rewrite));
        assert_eq!(Mode::parse("draft"), None);
        assert_eq!(Mode::default(), Mode::Rewrite);
    }

    #[test]
    fn test_mode_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Write).unwrap(), "\"write\"");
        let mode: Mode = serde_json::from_str("\"rewrite\"").unwrap();
        assert_eq!(mode, Mode::Rewrite);
    }
}
