//! Question-like phrase extraction from search results
//!
//! Two heuristic pattern families are applied to `title + snippet`:
//! wh-/modal-led clauses ending in `?`, and comparison or superlative phrases
//! ("best", "vs", "versus", ...) that need no question mark. Matches are
//! best-effort signal, not a classifier.

use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use blog_core::SearchResult;

/// Maximum number of phrases returned per call
pub const MAX_QUESTIONS: usize = 10;

fn question_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(what|how|why|when|where|which|who|is|are|can|should|will|would|could|do|does|did)\b[^.!?]*\?",
        )
        .expect("question pattern is valid")
    })
}

fn comparison_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(best|top|better|worst|compare|vs|versus)\b[^.!?]*")
            .expect("comparison pattern is valid")
    })
}

/// Extract up to [`MAX_QUESTIONS`] distinct question-like phrases, in first-seen order
pub fn extract_questions(results: &[SearchResult]) -> Vec<String> {
    let mut questions: IndexSet<String> = IndexSet::new();

    for result in results {
        let text = format!("{} {}", result.title, result.snippet);

        for m in question_pattern().find_iter(&text) {
            push_trimmed(&mut questions, m.as_str());
        }

        for m in comparison_pattern().captures_iter(&text) {
            let (Some(whole), Some(keyword)) = (m.get(0), m.get(1)) else {
                continue;
            };
            if let Some(end) = phrase_end(&text, keyword.end(), whole.end()) {
                push_trimmed(&mut questions, &text[whole.start()..end]);
            }
        }
    }

    questions.into_iter().take(MAX_QUESTIONS).collect()
}

/// Last offset in `min..=max` that sits at end of text or before whitespace
///
/// Comparison phrases stop on a word boundary followed by whitespace (or the
/// end of the text), never mid-token.
fn phrase_end(text: &str, min: usize, max: usize) -> Option<usize> {
    if max == text.len() {
        return Some(max);
    }
    std::iter::once(max)
        .chain(text[..max].char_indices().rev().map(|(i, _)| i))
        .filter(|&i| i >= min)
        .find(|&i| text[i..].chars().next().is_some_and(char::is_whitespace))
}

fn push_trimmed(questions: &mut IndexSet<String>, phrase: &str) {
    let trimmed = phrase.trim();
    if !trimmed.is_empty() {
        questions.insert(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, snippet: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: "https://example.org".to_string(),
            snippet: snippet.to_string(),
            date: None,
        }
    }

    #[test]
    fn test_extracts_wh_questions() {
        let results = vec![result(
            "Forex basics",
            "How do spreads work? Traders often ask. What is leverage?",
        )];
        let questions = extract_questions(&results);
        assert!(questions.contains(&"How do spreads work?".to_string()));
        assert!(questions.contains(&"What is leverage?".to_string()));
    }

    #[test]
    fn test_extracts_comparison_phrases() {
        let results = vec![result("Best forex brokers for beginners", "")];
        let questions = extract_questions(&results);
        assert_eq!(questions, vec!["Best forex brokers for beginners".to_string()]);
    }

    #[test]
    fn test_comparison_stops_before_sentence_end() {
        let results = vec![result("Review", "IG vs Plus500 today. Fees are low.")];
        let questions = extract_questions(&results);
        assert_eq!(questions, vec!["vs Plus500".to_string()]);
    }

    #[test]
    fn test_deduplicates_and_caps() {
        let results: Vec<SearchResult> = (0..20)
            .map(|i| result(&format!("What is strategy {}?", i), "What is strategy 0?"))
            .collect();
        let questions = extract_questions(&results);
        assert_eq!(questions.len(), MAX_QUESTIONS);
        assert_eq!(questions[0], "What is strategy 0?");
        assert_eq!(questions[1], "What is strategy 1?");
    }

    #[test]
    fn test_no_matches() {
        let results = vec![result("Market wrap", "Stocks closed higher on Friday.")];
        assert!(extract_questions(&results).is_empty());
    }
}
