//! Scenario lexicon and its process-wide store
//!
//! The lexicon maps each scenario label to its trigger keywords. It is read
//! once from a JSON document (`{"complaint": ["refund", ...], ...}`) and then
//! shared read-only. When the document cannot be fetched or parsed the store
//! falls back to a built-in bilingual lexicon and keeps using it.

use crate::classifier::ScenarioLabel;
use replykit_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Keywords for one scenario label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub label: ScenarioLabel,
    /// Lower-cased, unique within the entry
    pub keywords: Vec<String>,
}

/// Immutable label → keywords mapping
///
/// Entry order is the order of the source document and decides keyword-score
/// ties: the first label to reach the maximum weight wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Build a lexicon, lower-casing and de-duplicating keywords.
    ///
    /// A label given twice has its keywords appended to its first entry.
    pub fn new<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ScenarioLabel, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        for (label, keywords) in entries {
            let index = match lexicon.entries.iter().position(|e| e.label == label) {
                Some(index) => index,
                None => {
                    lexicon.entries.push(LexiconEntry {
                        label,
                        keywords: Vec::new(),
                    });
                    lexicon.entries.len() - 1
                }
            };
            let entry = &mut lexicon.entries[index];
            for keyword in keywords {
                let keyword = keyword.as_ref().to_lowercase();
                if !entry.keywords.contains(&keyword) {
                    entry.keywords.push(keyword);
                }
            }
        }
        lexicon
    }

    /// Parse a JSON mapping of label tag → keyword array.
    ///
    /// Unknown label tags are skipped. A document with no known label is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(document.len());
        for (tag, value) in document {
            let label = match tag.parse::<ScenarioLabel>() {
                Ok(label) => label,
                Err(_) => {
                    warn!("Skipping unknown scenario label '{}' in lexicon", tag);
                    continue;
                }
            };
            let keywords: Vec<String> = serde_json::from_value(value).map_err(|e| {
                Error::lexicon(format!("keywords for '{tag}' must be an array of strings: {e}"))
            })?;
            entries.push((label, keywords));
        }

        if entries.is_empty() {
            return Err(Error::lexicon("document contains no known scenario labels"));
        }

        Ok(Self::new(entries))
    }

    /// Built-in bilingual lexicon used when no external one is available
    pub fn builtin() -> Self {
        Self::new([
            (
                ScenarioLabel::Compliment,
                vec![
                    "love", "amazing", "good", "nice", "great", "excellent", "perfect",
                    "wonderful", "awesome", "outstanding", "impressive", "exceptional",
                    "brilliant", "superb", "好喜欢", "喜欢", "赞", "棒", "优秀", "出色", "完美",
                    "太好了", "厉害", "满意", "不错", "给力", "精彩", "佩服", "欣赏", "称赞",
                    "推荐", "真棒", "大赞", "赞美",
                ],
            ),
            (
                ScenarioLabel::Complaint,
                vec![
                    "refund", "bad", "issue", "problem", "terrible", "disappointing", "broken",
                    "fault", "poor", "worst", "complaint", "dissatisfied", "unhappy",
                    "unsatisfied", "fix", "坏了", "差评", "退款", "问题", "差", "不满", "失望",
                    "糟糕", "难用", "故障", "投诉", "不好", "缺陷", "无法", "不能", "欺骗",
                    "骗子", "垃圾", "难受", "烂",
                ],
            ),
            (
                ScenarioLabel::Inquiry,
                vec![
                    "how to", "where", "when", "what", "why", "delivery", "help", "assist",
                    "support", "question", "inquiry", "ask", "wondering", "guide", "guidance",
                    "explain", "could you", "咨询", "怎么", "如何", "哪里", "什么", "为什么",
                    "什么时候", "能否", "请问", "帮忙", "支持", "指导", "询问", "解释", "说明",
                    "教程", "不懂", "需要了解", "是否可以",
                ],
            ),
            (
                ScenarioLabel::Gratitude,
                vec![
                    "thank", "thanks", "appreciate", "grateful", "thankful", "感谢", "谢谢",
                    "多谢", "感激", "谢意", "致谢", "鸣谢", "幸运", "荣幸",
                ],
            ),
        ])
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.iter()
    }

    /// Keywords registered for `label`
    pub fn keywords(&self, label: ScenarioLabel) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.keywords.as_slice())
    }

    pub fn labels(&self) -> Vec<ScenarioLabel> {
        self.entries.iter().map(|e| e.label).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the store reads its lexicon from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexiconSource {
    /// The built-in lexicon, no I/O
    #[default]
    Builtin,
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON document served over HTTP(S)
    Url(String),
}

impl LexiconSource {
    /// Interpret a command-line value: `http://` and `https://` are URLs, anything else a path
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for LexiconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Lazily loaded, read-only lexicon cache
///
/// The first [`get`](Self::get) loads from the configured source; every later
/// call returns the same `Arc` without touching the source again. Load
/// failures are logged and absorbed by the built-in lexicon.
pub struct LexiconStore {
    source: LexiconSource,
    cache: OnceCell<Arc<Lexicon>>,
}

impl LexiconStore {
    pub fn new(source: LexiconSource) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    /// Store backed by the built-in lexicon
    pub fn builtin() -> Self {
        Self::new(LexiconSource::Builtin)
    }

    /// Store that is already warm with `lexicon`
    pub fn preloaded(lexicon: Lexicon) -> Self {
        Self {
            source: LexiconSource::Builtin,
            cache: OnceCell::new_with(Some(Arc::new(lexicon))),
        }
    }

    pub fn source(&self) -> &LexiconSource {
        &self.source
    }

    /// Whether the lexicon has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    /// Get the lexicon, loading it on first use
    pub async fn get(&self) -> Arc<Lexicon> {
        self.cache
            .get_or_init(|| async { Arc::new(self.load().await) })
            .await
            .clone()
    }

    async fn load(&self) -> Lexicon {
        match self.fetch().await {
            Ok(lexicon) => {
                info!(
                    "Loaded scenario lexicon from {} with labels {:?}",
                    self.source,
                    lexicon.labels()
                );
                lexicon
            }
            Err(e) => {
                warn!(
                    "Failed to load scenario lexicon from {}: {}; using built-in lexicon",
                    self.source, e
                );
                Lexicon::builtin()
            }
        }
    }

    async fn fetch(&self) -> Result<Lexicon> {
        match &self.source {
            LexiconSource::Builtin => Ok(Lexicon::builtin()),
            LexiconSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                Lexicon::from_json(&content)
            }
            LexiconSource::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| Error::lexicon(format!("request failed: {e}")))?;
                let content = response
                    .text()
                    .await
                    .map_err(|e| Error::lexicon(format!("failed to read body: {e}")))?;
                Lexicon::from_json(&content)
            }
        }
    }
}

impl Default for LexiconStore {
    fn default() -> Self {
        Self::builtin()
    }
}
