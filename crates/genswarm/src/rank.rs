/// Lexical ranker: term-frequency cosine similarity between the query and each page.
///
/// The "index" is nothing more than the per-request term counts; it is rebuilt from
/// the fetched documents every time and thrown away afterwards.
use std::collections::HashMap;

use crate::model::{Document, ScoredDocument};

/// How many documents make it into the prompt context.
pub const DEFAULT_TOP_N: usize = 3;

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Token → occurrence count.
pub type TermFrequency = HashMap<String, u32>;

/// Lowercase, turn anything outside `[a-z0-9]` and whitespace into a space, split.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    normalized.split_whitespace().map(str::to_string).collect()
}

pub fn term_frequency<I, S>(tokens: I) -> TermFrequency
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut freq = TermFrequency::new();
    for token in tokens {
        *freq.entry(token.into()).or_insert(0) += 1;
    }
    freq
}

/// Cosine of the angle between two count vectors. Zero, never NaN, when either is empty.
pub fn cosine_similarity(a: &TermFrequency, b: &TermFrequency) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, &x)| large.get(term).map(|&y| f64::from(x) * f64::from(y)))
        .sum();

    let norm = |v: &TermFrequency| v.values().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();
    let mut denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        denominator = 1.0;
    }
    (dot / denominator).clamp(0.0, 1.0)
}

/// Score every document against `query` and keep the best `top_n`.
///
/// Sorting is stable, so equal scores keep fetch order. With fewer than `top_n`
/// documents, all of them are returned.
pub fn rank_documents(query: &str, documents: Vec<Document>, top_n: usize) -> Vec<ScoredDocument> {
    let query_freq = term_frequency(tokenize(query));

    let mut scored: Vec<ScoredDocument> = documents
        .into_iter()
        .map(|document| {
            let doc_freq = term_frequency(tokenize(&document.text));
            let score = cosine_similarity(&query_freq, &doc_freq);
            ScoredDocument { document, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

/// Render ranked documents as the prompt context block.
pub fn format_context(ranked: &[ScoredDocument]) -> String {
    ranked
        .iter()
        .map(|s| format!("SOURCE: {}\n\n{}", s.document.url, s.document.text))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(text: &str) -> TermFrequency {
        term_frequency(tokenize(text))
    }

    #[test]
    fn tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("What is the RL-Swarm repo?"),
            vec!["what", "is", "the", "rl", "swarm", "repo"]
        );
        assert_eq!(tokenize("  ...  "), Vec::<String>::new());
        assert_eq!(tokenize("Café №5"), vec!["caf", "5"]);
    }

    #[test]
    fn tokenize_is_idempotent_on_normalized_text() {
        let once = tokenize("Gensyn's RL Swarm: v0.5, Testnet!");
        let again = tokenize(&once.join(" "));
        assert_eq!(once, again);
        assert!(once.iter().all(|t| !t.is_empty()
            && t.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())));
    }

    #[test]
    fn term_frequency_counts_repeats() {
        let freq = tf("swarm swarm node");
        assert_eq!(freq.get("swarm"), Some(&2));
        assert_eq!(freq.get("node"), Some(&1));
        assert_eq!(freq.len(), 2);
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let a = tf("rl swarm training on the testnet");
        let b = tf("swarm swarm of rl nodes");
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0 && ab <= 1.0);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_zero_for_empty_vectors() {
        let empty = TermFrequency::new();
        let a = tf("rl swarm");
        assert_eq!(cosine_similarity(&empty, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
        assert_eq!(cosine_similarity(&a, &tf("unrelated words")), 0.0);
    }

    #[test]
    fn rl_swarm_page_ranks_first() {
        let docs = vec![
            Document::new("https://docs.gensyn.ai", "Welcome to the documentation portal for builders"),
            Document::new("https://blog.gensyn.ai", "Our latest announcements and community updates"),
            Document::new(
                "https://github.com/gensyn-ai/rl-swarm",
                "RL Swarm is a fully open source framework for RL training over the internet. This repo contains the swarm node",
            ),
            Document::new("https://gensyn.ai/research", "Papers on verification and machine learning"),
            Document::new("https://gensyn.ai/testnet", "Join the testnet and earn points"),
        ];
        let ranked = rank_documents("What is the RL Swarm repo?", docs, DEFAULT_TOP_N);
        assert_eq!(ranked[0].document.url, "https://github.com/gensyn-ai/rl-swarm");
    }

    #[test]
    fn returns_at_most_top_n_sorted_descending() {
        let docs: Vec<Document> = (0..6)
            .map(|i| Document::new(format!("https://s/{i}"), "swarm ".repeat(i) + "other"))
            .collect();
        let ranked = rank_documents("swarm", docs, 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(ranked[0].document.url, "https://s/5");
    }

    #[test]
    fn fewer_documents_than_top_n_returns_all() {
        let docs = vec![Document::new("https://a", "alpha"), Document::empty("https://b")];
        let ranked = rank_documents("alpha", docs, 3);
        assert_eq!(ranked.len(), 2);
        assert!(rank_documents("alpha", Vec::new(), 3).is_empty());
    }

    #[test]
    fn failed_fetch_scores_zero_but_can_fill_slots() {
        let docs = vec![
            Document::empty("https://failed"),
            Document::new("https://hit", "rl swarm"),
            Document::new("https://miss", "nothing relevant"),
        ];
        let ranked = rank_documents("swarm", docs, 3);
        assert_eq!(ranked[0].document.url, "https://hit");
        let failed = ranked
            .iter()
            .find(|s| s.document.url == "https://failed")
            .unwrap();
        assert_eq!(failed.score, 0.0);
    }

    #[test]
    fn ties_keep_fetch_order() {
        let docs = vec![
            Document::new("https://first", "zzz"),
            Document::new("https://second", "yyy"),
            Document::new("https://third", "xxx"),
            Document::new("https://fourth", "www"),
        ];
        let ranked = rank_documents("swarm", docs, 3);
        let urls: Vec<&str> = ranked.iter().map(|s| s.document.url.as_str()).collect();
        assert_eq!(urls, ["https://first", "https://second", "https://third"]);
    }

    #[test]
    fn context_tags_each_source_and_separates_entries() {
        let docs = vec![
            Document::new("https://a", "swarm alpha"),
            Document::new("https://b", "swarm beta"),
        ];
        let context = format_context(&rank_documents("swarm", docs, 3));
        assert_eq!(
            context,
            "SOURCE: https://a\n\nswarm alpha\n\n---\n\nSOURCE: https://b\n\nswarm beta"
        );
    }
}
