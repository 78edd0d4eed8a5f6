use crate::ruleset::CompiledRuleset;
use compact_str::CompactString;
use radix_trie::Trie;
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::sync::Arc;

pub type PlainIndex = HashMap<CompactString, Arc<CompiledRuleset>, FxBuildHasher>;
pub type WildcardIndex = Trie<Vec<u8>, Arc<CompiledRuleset>>;

/// The published lookup tables. Immutable once built; replaced wholesale via
/// `ArcSwap<RuleIndex>`, so readers see either the pre-build empty tables or
/// a fully built set, never a partial state.
///
/// Both wildcard shapes live in one radix tree over host bytes:
///   `example.*`      → key `example.`
///   `*.example.com`  → key `reverse(".example.com")` = `moc.elpmaxe.`
/// A longest-prefix query subsumes both forms in O(|host|). The anchoring dot
/// is part of the stored key, so `evil-example.com` cannot reach the
/// `*.example.com` rule set.
pub struct RuleIndex {
    plain: PlainIndex,
    wildcard: WildcardIndex,
    pub compiled_rulesets: usize,
    pub dropped_rulesets: usize,
}

impl RuleIndex {
    pub fn empty() -> Self {
        Self::new(
            PlainIndex::with_hasher(FxBuildHasher),
            Trie::new(),
            0,
            0,
        )
    }

    pub(crate) fn new(
        plain: PlainIndex,
        wildcard: WildcardIndex,
        compiled_rulesets: usize,
        dropped_rulesets: usize,
    ) -> Self {
        Self {
            plain,
            wildcard,
            compiled_rulesets,
            dropped_rulesets,
        }
    }

    pub fn plain_len(&self) -> usize {
        self.plain.len()
    }

    /// Exact-host probe.
    #[inline]
    pub fn lookup_exact(&self, host: &str) -> Option<&Arc<CompiledRuleset>> {
        self.plain.get(host)
    }

    /// Prefix-wildcard probe: longest-prefix match of the reversed host
    /// against reversed `*.`-target keys.
    #[inline]
    pub fn lookup_prefix_wildcard(&self, host: &str) -> Option<&Arc<CompiledRuleset>> {
        self.wildcard.get_ancestor_value(&reverse_host(host))
    }

    /// Suffix-wildcard probe: longest-prefix match of the host itself against
    /// `x.*`-target keys.
    #[inline]
    pub fn lookup_suffix_wildcard(&self, host: &str) -> Option<&Arc<CompiledRuleset>> {
        self.wildcard.get_ancestor_value(&host.as_bytes().to_vec())
    }
}

/// Byte-reverse `host` (`fr.wikipedia.org` → `gro.aidepikiw.rf`).
///
/// Hosts are treated as opaque bytes: the reversal of a non-ASCII host is not
/// valid UTF-8, which is why the wildcard tree is keyed by `Vec<u8>`.
#[inline]
pub(crate) fn reverse_host(host: &str) -> Vec<u8> {
    host.as_bytes().iter().rev().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{CompiledRuleset, Rule};
    use regex::Regex;

    fn upgrade_ruleset() -> Arc<CompiledRuleset> {
        Arc::new(CompiledRuleset {
            exclusions: vec![],
            rules: vec![Rule {
                from: Regex::new("^http:").unwrap(),
                to: "https:".to_string(),
            }],
        })
    }

    fn index_with_wildcards(keys: &[&str]) -> RuleIndex {
        let mut wildcard = Trie::new();
        for key in keys {
            wildcard.insert(key.as_bytes().to_vec(), upgrade_ruleset());
        }
        RuleIndex::new(PlainIndex::with_hasher(FxBuildHasher), wildcard, keys.len(), 0)
    }

    #[test]
    fn test_reverse_host() {
        assert_eq!(reverse_host("abc.de"), b"ed.cba".to_vec());
        assert_eq!(reverse_host(""), Vec::<u8>::new());
    }

    #[test]
    fn test_prefix_wildcard_matches_subdomains_only() {
        // Stored form of `*.example.com`.
        let index = index_with_wildcards(&["moc.elpmaxe."]);

        assert!(index.lookup_prefix_wildcard("www.example.com").is_some());
        assert!(index.lookup_prefix_wildcard("a.b.example.com").is_some());
        // The bare domain has no label boundary where the key expects one.
        assert!(index.lookup_prefix_wildcard("example.com").is_none());
        assert!(index.lookup_prefix_wildcard("evil-example.com").is_none());
    }

    #[test]
    fn test_suffix_wildcard_matches_any_tld() {
        // Stored form of `rabbitmq.*`.
        let index = index_with_wildcards(&["rabbitmq."]);

        assert!(index.lookup_suffix_wildcard("rabbitmq.com").is_some());
        assert!(index.lookup_suffix_wildcard("rabbitmq.net").is_some());
        assert!(index.lookup_suffix_wildcard("rabbitmq").is_none());
        assert!(index.lookup_suffix_wildcard("rabbitmqX.com").is_none());
    }

    #[test]
    fn test_longest_prefix_wins_among_nested_keys() {
        let mut wildcard: WildcardIndex = Trie::new();
        let broad = upgrade_ruleset();
        let narrow = Arc::new(CompiledRuleset {
            exclusions: vec![],
            rules: vec![Rule {
                from: Regex::new("^http:").unwrap(),
                to: "https://narrow:".to_string(),
            }],
        });
        // `*.state.gov` and `*.history.state.gov`, reversed.
        wildcard.insert(reverse_host(".state.gov"), broad);
        wildcard.insert(reverse_host(".history.state.gov"), Arc::clone(&narrow));
        let index = RuleIndex::new(PlainIndex::with_hasher(FxBuildHasher), wildcard, 2, 0);

        let hit = index
            .lookup_prefix_wildcard("test.history.state.gov")
            .unwrap();
        assert_eq!(hit.rules[0].to, narrow.rules[0].to);
        assert!(index.lookup_prefix_wildcard("war.state.gov").is_some());
    }

    #[test]
    fn test_empty_index_misses() {
        let index = RuleIndex::empty();
        assert!(index.lookup_exact("example.com").is_none());
        assert!(index.lookup_prefix_wildcard("example.com").is_none());
        assert!(index.lookup_suffix_wildcard("example.com").is_none());
    }
}
