use crate::traits::CatalogEntry;
use std::collections::HashSet;
use std::time::{Duration, Instant};

const ZERO_PRICE: &str = "0";
const DEFAULT_TTL: Duration = Duration::from_secs(600);

fn is_free(entry: &CatalogEntry) -> bool {
    entry.pricing.prompt == ZERO_PRICE && entry.pricing.completion == ZERO_PRICE
}

fn emits_text(entry: &CatalogEntry) -> bool {
    let arch = &entry.architecture;
    arch.modality.is_empty()
        || arch.modality.contains("text->text")
        || arch.output_modalities.iter().any(|m| m == "text")
}

/// Filter the catalog down to zero-cost text models and rank them,
/// best candidate first: explicit `:free` variants, then
/// instruct/chat-tuned models, then shorter identifiers. The sort is
/// stable; identifiers are deduplicated first.
pub fn rank_free_models(entries: &[CatalogEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids: Vec<String> = entries
        .iter()
        .filter(|e| is_free(e) && emits_text(e))
        .map(|e| e.id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect();

    ids.sort_by_key(|id| {
        let lower = id.to_lowercase();
        (
            !lower.contains(":free"),
            !(lower.contains("instruct") || lower.contains("chat")),
            id.len(),
        )
    });
    ids
}

/// TTL cache for the ranked free-model list. Failed fetches are never
/// stored, so the next call retries the catalog endpoint.
pub struct ModelCache {
    entries: Vec<String>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            fetched_at: None,
            ttl,
        }
    }

    /// Returns a copy of the cached list while it is still fresh.
    pub fn fresh(&self) -> Option<Vec<String>> {
        match self.fetched_at {
            Some(at) if !self.entries.is_empty() && at.elapsed() < self.ttl => {
                Some(self.entries.clone())
            }
            _ => None,
        }
    }

    pub fn store(&mut self, entries: Vec<String>) {
        self.entries = entries;
        self.fetched_at = Some(Instant::now());
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Architecture, Pricing};

    fn entry(id: &str, prompt: &str, completion: &str, modality: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            pricing: Pricing {
                prompt: prompt.to_string(),
                completion: completion.to_string(),
            },
            architecture: Architecture {
                modality: modality.to_string(),
                output_modalities: vec![],
            },
        }
    }

    #[test]
    fn paid_models_are_filtered_out() {
        let entries = vec![
            entry("a/paid", "0.001", "0.002", "text->text"),
            entry("b/free", "0", "0", "text->text"),
        ];
        assert_eq!(rank_free_models(&entries), vec!["b/free"]);
    }

    #[test]
    fn non_text_models_are_filtered_out() {
        let entries = vec![
            entry("a/image", "0", "0", "text->image"),
            entry("b/text", "0", "0", "text->text"),
        ];
        assert_eq!(rank_free_models(&entries), vec!["b/text"]);
    }

    #[test]
    fn text_output_modality_is_enough() {
        let mut image_in = entry("a/multi", "0", "0", "image+text->other");
        image_in.architecture.output_modalities = vec!["text".to_string()];
        assert_eq!(rank_free_models(&[image_in]), vec!["a/multi"]);
    }

    #[test]
    fn ranking_prefers_free_tag_then_chat_then_length() {
        let entries = vec![
            entry("vendor/long-base-model", "0", "0", "text->text"),
            entry("vendor/big-instruct-model", "0", "0", "text->text"),
            entry("vendor/model:free", "0", "0", "text->text"),
        ];
        assert_eq!(
            rank_free_models(&entries),
            vec![
                "vendor/model:free",
                "vendor/big-instruct-model",
                "vendor/long-base-model",
            ]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let entries = vec![
            entry("vendor/model:free", "0", "0", "text->text"),
            entry("vendor/model:free", "0", "0", "text->text"),
        ];
        assert_eq!(rank_free_models(&entries).len(), 1);
    }

    #[test]
    fn cache_returns_copy_while_fresh() {
        let mut cache = ModelCache::with_ttl(Duration::from_secs(60));
        assert!(cache.fresh().is_none());

        cache.store(vec!["a".to_string(), "b".to_string()]);
        let first = cache.fresh().unwrap();
        let second = cache.fresh().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "b"]);
    }

    #[test]
    fn cache_expires_after_ttl() {
        let mut cache = ModelCache::with_ttl(Duration::from_millis(0));
        cache.store(vec!["a".to_string()]);
        assert!(cache.fresh().is_none());
    }

    #[test]
    fn empty_store_is_not_fresh() {
        let mut cache = ModelCache::with_ttl(Duration::from_secs(60));
        cache.store(Vec::new());
        assert!(cache.fresh().is_none());
    }
}
