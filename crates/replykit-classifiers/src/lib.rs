//! ReplyKit Classifiers
//!
//! Rule-plus-heuristic scenario classification for selected text.
//!
//! A [`ScenarioDetector`] maps free text to a [`ScenarioLabel`] with a
//! confidence score in three stages:
//! - Pattern detectors: high-precision regex rules that answer immediately
//! - Keyword scoring against a [`Lexicon`], weighted by keyword length and position
//! - Resolution: question, gratitude and sentiment signals adjust the keyword winner
//!
//! All stages are synchronous and deterministic; only the first lexicon load
//! awaits I/O.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod lexicon;
pub mod patterns;
pub mod resolver;
pub mod scorer;
pub mod sentiment;

pub use classifier::{ClassificationResult, ScenarioLabel};
pub use config::{DetectorConfig, LexiconSourceSpec};
pub use detector::ScenarioDetector;
pub use lexicon::{Lexicon, LexiconEntry, LexiconSource, LexiconStore};
pub use patterns::{Detector, PatternDetectors};
pub use resolver::{Resolution, Resolver, ResolverRule};
pub use scorer::{KeywordScorer, LabelScore, ScoreBoard};
pub use sentiment::{FeatureExtractor, TextFeatures};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, ScenarioLabel};
    pub use crate::detector::ScenarioDetector;
    pub use crate::lexicon::{Lexicon, LexiconSource, LexiconStore};
    pub use crate::patterns::{
        AgreementDetector, Detector, GreetingDetector, InstructionDetector, ReviewDetector,
    };
}
