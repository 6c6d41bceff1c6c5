/// Authoritative pages the chat answers from.
pub const GENSYN_SOURCES: [&str; 6] = [
    "https://docs.gensyn.ai",
    "https://blog.gensyn.ai",
    "https://gensyn.ai/research",
    "https://gensyn.ai/testnet",
    "https://github.com/gensyn-ai/rl-swarm",
    "https://github.com/gensyn-ai/blockassist",
];

/// Verified social accounts; the only handles the chat will ever name.
pub const GENSYN_HANDLES: [&str; 2] = ["https://x.com/gensynai", "https://x.com/0xLoui5"];

/// Immutable lists the chat pipeline works from, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCatalog {
    urls: Vec<String>,
    known_handles: Vec<String>,
}

impl SourceCatalog {
    pub fn new(urls: Vec<String>, known_handles: Vec<String>) -> Self {
        Self {
            urls,
            known_handles,
        }
    }

    pub fn gensyn() -> Self {
        Self::new(
            GENSYN_SOURCES.iter().map(|s| s.to_string()).collect(),
            GENSYN_HANDLES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn known_handles(&self) -> &[String] {
        &self.known_handles
    }
}
