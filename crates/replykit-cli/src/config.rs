//! Configuration loading for the command-line front end

use replykit_classifiers::{DetectorConfig, LexiconSource};
use std::path::Path;

/// Load detector configuration from file and apply CLI overrides
///
/// A missing file is not an error: the defaults (built-in lexicon) apply.
pub fn load(config_path: &str, lexicon_override: Option<&str>) -> anyhow::Result<DetectorConfig> {
    let mut config = if Path::new(config_path).exists() {
        DetectorConfig::from_file(config_path)?
    } else {
        DetectorConfig::default()
    };

    if let Some(lexicon) = lexicon_override {
        config.set_lexicon_source(LexiconSource::parse(lexicon));
    }

    Ok(config)
}
