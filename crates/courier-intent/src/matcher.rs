//! Rule-based intent matching.
//!
//! Maps common phrasings straight to an operation without calling the
//! language model. Rules are checked in a fixed priority order and the first
//! one that fires wins.

use regex::Regex;
use serde_json::{Map, Value};

use courier_core::OperationRegistry;

/// Raw `{operation, parameters}` pair awaiting validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub operation: String,
    pub parameters: Map<String, Value>,
}

impl Candidate {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            parameters: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.to_string(), Value::String(value.into()));
        self
    }
}

/// Phrases after which a search tag begins, checked in order.
const TAG_PHRASES: &[&str] = &[
    "search images of ",
    "search photos of ",
    "images of ",
    "photos of ",
];

/// How a rule pulls parameters out of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extract {
    Nothing,
    SearchTag,
    AlbumName,
}

/// A single rule: every pattern must match for it to fire.
struct Rule {
    operation: &'static str,
    patterns: Vec<Regex>,
    extract: Extract,
}

impl Rule {
    fn new(operation: &'static str, patterns: &[&str], extract: Extract) -> Self {
        Self {
            operation,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("Invalid matcher regex"))
                .collect(),
            extract,
        }
    }

    fn fires(&self, text: &str) -> bool {
        self.patterns.iter().all(|re| re.is_match(text))
    }
}

/// Ordered rule table, filtered to the operations a registry knows.
pub struct DeterministicMatcher {
    rules: Vec<Rule>,
    album_name: Regex,
}

impl DeterministicMatcher {
    /// Build a matcher whose rules only emit operations present in `registry`.
    pub fn new(registry: &OperationRegistry) -> Self {
        let mut matcher = Self::unfiltered();
        matcher.rules.retain(|r| registry.contains(r.operation));
        matcher
    }

    fn unfiltered() -> Self {
        let rules = vec![
            Rule::new(
                "list_photos",
                &[r"(?i)\blist\s+(?:photos|images)\b"],
                Extract::Nothing,
            ),
            Rule::new(
                "search_photos",
                &[r"(?i)search|seach", r"(?i)photo|image"],
                Extract::SearchTag,
            ),
            Rule::new("create_album", &[r"(?i)\bcreate\s+album\b"], Extract::AlbumName),
            Rule::new("list_albums", &[r"(?i)\blist\s+albums\b"], Extract::Nothing),
            Rule::new(
                "list_repositories",
                &[r"(?i)\blist\s+(?:my\s+)?(?:repos|repositories)\b"],
                Extract::Nothing,
            ),
        ];

        Self {
            rules,
            album_name: Regex::new(r"(?i)\bcreate\s+album\b(?:\s+(?:named|called)\b)?(.*)$")
                .expect("Invalid album regex"),
        }
    }

    /// Operations this matcher can emit, in priority order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.operation)
    }

    /// Classify `text`. `None` means no rule fired, which is a routing
    /// signal rather than an error.
    pub fn match_text(&self, text: &str) -> Option<Candidate> {
        let rule = self.rules.iter().find(|r| r.fires(text))?;
        let mut candidate = Candidate::new(rule.operation);

        match rule.extract {
            Extract::Nothing => {}
            Extract::SearchTag => {
                if let Some(tag) = extract_tag(text) {
                    candidate = candidate.with("tag", tag);
                }
            }
            Extract::AlbumName => {
                let name = self
                    .album_name
                    .captures(text)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty());
                if let Some(name) = name {
                    candidate = candidate.with("album_name", name);
                }
            }
        }

        tracing::debug!(operation = rule.operation, "Matcher rule fired");
        Some(candidate)
    }
}

/// Text after the last occurrence of the first tag phrase present, lowercased.
fn extract_tag(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let phrase = TAG_PHRASES.iter().find(|p| lower.contains(*p))?;
    let start = lower.rfind(phrase)? + phrase.len();
    let tag = lower[start..].trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}
