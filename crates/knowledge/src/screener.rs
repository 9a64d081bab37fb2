//! Prompt screening.
//!
//! Cheap deterministic rules that keep small talk, off-topic requests and
//! keyboard mashing away from retrieval and generation.

use serde::Serialize;

/// Minimum length, in characters, of a trimmed prompt.
pub const MIN_PROMPT_CHARS: usize = 3;

/// Identical consecutive characters that count as jibberish.
pub const JIBBERISH_RUN: usize = 4;

pub const REASON_TOO_SHORT: &str = "Prompt too short";
pub const REASON_NO_CONTEXT: &str = "No relevant context keywords found";
pub const REASON_JIBBERISH: &str = "Detected jibberish";

const BLOCKED_PATTERNS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "what's up",
    "how are you",
    "how's it going",
    "tell me a joke",
    "sing a song",
    "what's the weather",
    "random",
    "nonsense",
    "asdf",
    "qwerty",
    "test test test",
];

const CONTEXT_KEYWORDS: &[&str] = &[
    "olathe",
    "police",
    "officer",
    "perp",
    "suspect",
    "case",
    "crime",
    "pursuit",
    "arrest",
    "emergency",
    "dispatch",
    "patrol",
    "investigation",
    "criminal",
    "robbery",
    "assault",
    "murder",
    "theft",
    "burglary",
    "location",
    "address",
    "vehicle",
    "strategy",
    "history",
    "data",
    "help",
    "assist",
    "recommend",
    "suggest",
    "query",
    "search",
    "find",
];

// Trailing space keeps "is" from matching inside "this".
const QUESTION_WORDS: &[&str] = &[
    "what ", "where ", "when ", "who ", "why ", "how ", "which ", "can ", "could ", "should ",
    "is ", "are ", "do ", "does ", "did ",
];

const KEYBOARD_MASH: &[&str] = &["asdf", "qwerty", "zxcv", "hjkl", "12345", "abcde"];

/// Admission decision for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningVerdict {
    pub admitted: bool,

    /// Rejection reason; empty when admitted
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

impl ScreeningVerdict {
    fn admit() -> Self {
        Self {
            admitted: true,
            reason: String::new(),
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Self {
            admitted: false,
            reason: reason.into(),
        }
    }
}

/// Rule-based prompt filter. Stateless; share freely.
#[derive(Debug, Clone, Default)]
pub struct PromptScreener;

impl PromptScreener {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether a prompt reaches the pipeline.
    ///
    /// Checks run in a fixed order: length, blocked patterns, domain
    /// relevance, jibberish. Small talk is let through when the prompt also
    /// names something from the domain. A prompt too short to be useful is
    /// still reported as blocked when it is itself small talk (e.g. "hi").
    pub fn screen(&self, prompt: &str) -> ScreeningVerdict {
        let normalized = prompt.trim().to_lowercase();
        let on_topic = CONTEXT_KEYWORDS.iter().any(|k| normalized.contains(k));

        let blocked = BLOCKED_PATTERNS
            .iter()
            .find(|pattern| normalized.contains(*pattern))
            .filter(|_| !on_topic);

        if normalized.chars().count() < MIN_PROMPT_CHARS {
            return match blocked {
                Some(pattern) => blocked_verdict(pattern),
                None => ScreeningVerdict::reject(REASON_TOO_SHORT),
            };
        }

        if let Some(pattern) = blocked {
            return blocked_verdict(pattern);
        }

        if !on_topic && !QUESTION_WORDS.iter().any(|q| normalized.starts_with(q)) {
            return ScreeningVerdict::reject(REASON_NO_CONTEXT);
        }

        if is_jibberish(&normalized) {
            return ScreeningVerdict::reject(REASON_JIBBERISH);
        }

        ScreeningVerdict::admit()
    }
}

fn blocked_verdict(pattern: &str) -> ScreeningVerdict {
    tracing::debug!("Prompt matched blocked pattern {:?}", pattern);
    ScreeningVerdict::reject(format!("Contains blocked pattern: {}", pattern))
}

fn is_jibberish(text: &str) -> bool {
    if KEYBOARD_MASH.iter().any(|p| text.contains(p)) {
        return true;
    }

    let mut run = 0;
    let mut previous = None;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= JIBBERISH_RUN {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}
