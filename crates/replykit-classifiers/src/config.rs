//! Detector configuration

use crate::lexicon::LexiconSource;
use crate::patterns::DEFAULT_GREETING_MAX_CHARS;
use replykit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the scenario detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Lexicon location; the built-in lexicon when absent
    #[serde(default)]
    pub lexicon: Option<LexiconSourceSpec>,

    /// Greeting detector length gate, in characters
    #[serde(default = "default_greeting_max_chars")]
    pub greeting_max_chars: usize,
}

/// Lexicon source specification (for config files)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LexiconSourceSpec {
    /// Local JSON file
    Local { path: PathBuf },

    /// JSON document over HTTP(S)
    Remote { url: String },
}

impl DetectorConfig {
    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse detector config: {e}")))
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Where the lexicon should be loaded from
    pub fn lexicon_source(&self) -> LexiconSource {
        match &self.lexicon {
            None => LexiconSource::Builtin,
            Some(LexiconSourceSpec::Local { path }) => LexiconSource::File(path.clone()),
            Some(LexiconSourceSpec::Remote { url }) => LexiconSource::Url(url.clone()),
        }
    }

    /// Replace the lexicon location
    pub fn set_lexicon_source(&mut self, source: LexiconSource) {
        self.lexicon = match source {
            LexiconSource::Builtin => None,
            LexiconSource::File(path) => Some(LexiconSourceSpec::Local { path }),
            LexiconSource::Url(url) => Some(LexiconSourceSpec::Remote { url }),
        };
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lexicon: None,
            greeting_max_chars: default_greeting_max_chars(),
        }
    }
}

fn default_greeting_max_chars() -> usize {
    DEFAULT_GREETING_MAX_CHARS
}
