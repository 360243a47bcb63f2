//! Scenario detector entry point
//!
//! ```text
//! text ─┬─ empty? ───────────────────────────────► other (0.0)
//!       ├─ pattern detectors (first hit wins) ───► fixed label/confidence
//!       └─ keyword scorer ─► features ─► resolver ► label/confidence
//! ```
//!
//! [`ScenarioDetector::detect`] never fails: internal errors come back as an
//! `other` result with the error message attached.

use crate::classifier::{round_to, ClassificationResult};
use crate::config::DetectorConfig;
use crate::lexicon::{Lexicon, LexiconStore};
use crate::patterns::{PatternDetectors, DEFAULT_GREETING_MAX_CHARS};
use crate::resolver::Resolver;
use crate::scorer::KeywordScorer;
use crate::sentiment::FeatureExtractor;
use replykit_core::{fingerprint, Result};
use std::sync::Arc;
use tracing::{debug, error};

/// Classifies selected text into a communicative scenario
pub struct ScenarioDetector {
    store: LexiconStore,
    patterns: PatternDetectors,
    scorer: KeywordScorer,
    features: FeatureExtractor,
    resolver: Resolver,
}

impl ScenarioDetector {
    /// Detector with the built-in lexicon and default settings
    pub fn new() -> Result<Self> {
        Self::with_store(LexiconStore::builtin(), DEFAULT_GREETING_MAX_CHARS)
    }

    /// Detector configured from a [`DetectorConfig`]
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::with_store(
            LexiconStore::new(config.lexicon_source()),
            config.greeting_max_chars,
        )
    }

    /// Detector with an already loaded lexicon
    pub fn with_lexicon(lexicon: Lexicon) -> Result<Self> {
        Self::with_store(LexiconStore::preloaded(lexicon), DEFAULT_GREETING_MAX_CHARS)
    }

    pub fn with_store(store: LexiconStore, greeting_max_chars: usize) -> Result<Self> {
        Ok(Self {
            store,
            patterns: PatternDetectors::new(greeting_max_chars)?,
            scorer: KeywordScorer::new(),
            features: FeatureExtractor::new()?,
            resolver: Resolver::new(),
        })
    }

    pub fn store(&self) -> &LexiconStore {
        &self.store
    }

    /// Load the lexicon if it has not been loaded yet
    pub async fn warm_up(&self) -> Arc<Lexicon> {
        self.store.get().await
    }

    /// Classify `text`, loading the lexicon on first use
    pub async fn detect(&self, text: &str) -> ClassificationResult {
        if text.is_empty() {
            debug!("Scenario detection skipped: empty text");
            return ClassificationResult::empty();
        }
        let lexicon = self.store.get().await;
        self.detect_with(&lexicon, text)
    }

    /// Classify `text` against an explicit lexicon
    pub fn detect_with(&self, lexicon: &Lexicon, text: &str) -> ClassificationResult {
        if text.is_empty() {
            return ClassificationResult::empty();
        }

        debug!(
            "Scenario detection started: {} chars, starting with '{}'",
            text.chars().count(),
            text.chars().take(30).collect::<String>()
        );

        match self.evaluate(lexicon, text) {
            Ok(result) => {
                debug!(
                    "Scenario detected: {} (confidence {:.2}, sentiment {:.1}, question {})",
                    result.label, result.confidence, result.sentiment, result.is_question
                );
                result
            }
            Err(e) => {
                error!("Scenario detection failed: {}", e);
                ClassificationResult::failed(fingerprint(text), e)
            }
        }
    }

    fn evaluate(&self, lexicon: &Lexicon, text: &str) -> Result<ClassificationResult> {
        if let Some(result) = self.patterns.detect(text) {
            return Ok(result);
        }

        let board = self.scorer.score(lexicon, text)?;
        let features = self.features.extract(text);
        let resolution = self.resolver.resolve(&board, &features);

        Ok(ClassificationResult {
            label: resolution.label,
            confidence: resolution.confidence,
            sentiment: round_to(features.sentiment, 1),
            is_question: features.is_question(),
            matched_keywords: resolution.keywords,
            text_hash: fingerprint(text),
            error: None,
        })
    }
}
