use serde::{Deserialize, Serialize};
use std::fmt;

/// A single research question supplied by the user.
///
/// A prompt is never blank: [`Prompt::new`] rejects empty and
/// whitespace-only text, so every `Prompt` that exists is one the pipeline
/// will submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// Wrap `text` as a prompt, or `None` if it has no visible content.
    ///
    /// The text is kept verbatim; it is not trimmed.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Borrow the prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the prompt, returning the text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Market the prompts are researched for.
///
/// Interpolated into the request text only; the remote service is free to
/// ignore it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetMarket {
    /// Denmark
    #[default]
    Denmark,
    /// Norway
    Norway,
    /// Sweden
    Sweden,
    /// Finland
    Finland,
}

impl TargetMarket {
    /// All supported markets, in menu order.
    pub const ALL: [Self; 4] = [Self::Denmark, Self::Norway, Self::Sweden, Self::Finland];

    /// Country name as it appears in request text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Denmark => "Denmark",
            Self::Norway => "Norway",
            Self::Sweden => "Sweden",
            Self::Finland => "Finland",
        }
    }

    /// Lowercase slug used in file names (`seo_fanout_denmark.xlsx`).
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Denmark => "denmark",
            Self::Norway => "norway",
            Self::Sweden => "sweden",
            Self::Finland => "finland",
        }
    }
}

impl fmt::Display for TargetMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split free-form text into prompts, one per line.
///
/// Lines are trimmed and blank lines dropped.
pub fn prompts_from_lines(text: &str) -> Vec<Prompt> {
    text.lines().filter_map(|line| Prompt::new(line.trim())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_rejects_blank_text() {
        assert!(Prompt::new("").is_none());
        assert!(Prompt::new("   \t ").is_none());
        assert!(Prompt::new("\n").is_none());
    }

    #[test]
    fn test_prompt_keeps_text_verbatim() {
        let prompt = Prompt::new("  Best investments 2026 ").unwrap();
        assert_eq!(prompt.as_str(), "  Best investments 2026 ");
    }

    #[test]
    fn test_prompts_from_lines_trims_and_skips_blanks() {
        let prompts = prompts_from_lines("Best investments 2026\n\n   \n  Billig strøm  \n");
        let texts: Vec<&str> = prompts.iter().map(Prompt::as_str).collect();
        assert_eq!(texts, vec!["Best investments 2026", "Billig strøm"]);
    }

    #[test]
    fn test_target_market_default_is_denmark() {
        assert_eq!(TargetMarket::default(), TargetMarket::Denmark);
    }

    #[test]
    fn test_target_market_names_and_slugs() {
        for market in TargetMarket::ALL {
            assert_eq!(market.slug(), market.name().to_lowercase());
        }
        assert_eq!(TargetMarket::Sweden.to_string(), "Sweden");
    }

    #[test]
    fn test_target_market_deserializes_lowercase() {
        let market: TargetMarket = serde_json::from_str("\"norway\"").unwrap();
        assert_eq!(market, TargetMarket::Norway);
    }
}
