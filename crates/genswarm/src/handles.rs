/// Post-processing for social-handle questions.
///
/// Intent detection is a keyword heuristic. Whatever the model wrote, a handle
/// question is answered with one of the verified handles or with the fixed fallback.
use std::sync::OnceLock;

use regex::Regex;

pub const HANDLE_FALLBACK_REPLY: &str = "I couldn’t find an official social handle in the verified sources. You can follow Gensyn’s updates on [Docs](https://docs.gensyn.ai) or [Discord](https://discord.gg/gensyn).";

fn handle_intent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)handle|twitter|x handle|x account|social").expect("valid regex")
    })
}

pub fn asks_for_handle(message: &str) -> bool {
    handle_intent_re().is_match(message)
}

/// First verified handle, in allow-list order, that appears verbatim in `reply`.
pub fn find_known_handle<'a>(reply: &str, known_handles: &'a [String]) -> Option<&'a str> {
    known_handles
        .iter()
        .map(String::as_str)
        .find(|handle| reply.contains(handle))
}

pub fn handle_answer(handle: &str) -> String {
    format!(
        "✅ **Answer:**  \nYou can follow Gensyn on X at: {handle}  \n  \n📚 **Source:**  \n{handle}"
    )
}

/// Replace the model's reply for handle questions; other replies pass through.
pub fn apply_handle_policy(message: &str, reply: String, known_handles: &[String]) -> String {
    if !asks_for_handle(message) {
        return reply;
    }
    match find_known_handle(&reply, known_handles) {
        Some(handle) => handle_answer(handle),
        None => HANDLE_FALLBACK_REPLY.to_string(),
    }
}
