//! Campaign theme and template mode

use serde::{Deserialize, Serialize};

/// Aesthetic/rules preset chosen per game
///
/// Determines which character fields exist and which name, ability and
/// equipment pools the generator draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "theme-fantasy")]
    Fantasy,
    #[serde(rename = "theme-cyberpunk")]
    Cyberpunk,
    #[serde(rename = "theme-stalker")]
    Stalker,
    #[serde(rename = "theme-scifi")]
    SciFi,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Fantasy, Theme::Cyberpunk, Theme::Stalker, Theme::SciFi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fantasy => "theme-fantasy",
            Self::Cyberpunk => "theme-cyberpunk",
            Self::Stalker => "theme-stalker",
            Self::SciFi => "theme-scifi",
        }
    }

    /// Parse a theme id, falling back to fantasy for anything unrecognized.
    ///
    /// Accepts both the prefixed wire id (`theme-cyberpunk`) and the bare
    /// name (`cyberpunk`), case-insensitively.
    pub fn parse_lossy(s: &str) -> Self {
        let normalized = s.trim().to_ascii_lowercase();
        let bare = normalized.strip_prefix("theme-").unwrap_or(&normalized);
        match bare {
            "cyberpunk" => Self::Cyberpunk,
            "stalker" => Self::Stalker,
            "scifi" | "sci-fi" => Self::SciFi,
            _ => Self::Fantasy,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of a theme's field template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Simple,
    Standard,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Standard => "standard",
        }
    }

    /// Parse a mode, treating anything unrecognized as simple
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Self::Standard,
            _ => Self::Simple,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_accepts_prefixed_and_bare() {
        assert_eq!(Theme::parse_lossy("theme-cyberpunk"), Theme::Cyberpunk);
        assert_eq!(Theme::parse_lossy("Stalker"), Theme::Stalker);
        assert_eq!(Theme::parse_lossy("theme-sci-fi"), Theme::SciFi);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_fantasy() {
        assert_eq!(Theme::parse_lossy("unknown-theme"), Theme::Fantasy);
        assert_eq!(Theme::parse_lossy(""), Theme::Fantasy);
    }

    #[test]
    fn test_unknown_mode_is_simple() {
        assert_eq!(Mode::parse_lossy("standard"), Mode::Standard);
        assert_eq!(Mode::parse_lossy("detailed"), Mode::Simple);
        assert_eq!(Mode::default(), Mode::Simple);
    }

    #[test]
    fn test_theme_serializes_as_wire_id() {
        let json = serde_json::to_string(&Theme::SciFi).unwrap();
        assert_eq!(json, "\"theme-scifi\"");
    }
}
