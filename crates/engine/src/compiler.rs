use crate::index::{reverse_host, PlainIndex, RuleIndex, WildcardIndex};
use crate::ruleset::{CompiledRuleset, Exclusion, Rule};
use compact_str::CompactString;
use httpse_domain::{DomainError, RulesetRecord, TargetHost};
use radix_trie::Trie;
use regex::Regex;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Decode a serialized bundle into raw rule-set records.
///
/// A decode failure leaves whatever indexes are currently published
/// untouched; the caller keeps answering misses from them.
pub fn decode_bundle(bytes: &[u8]) -> Result<Vec<RulesetRecord>, DomainError> {
    serde_json::from_slice(bytes).map_err(|e| DomainError::BundleDecode(e.to_string()))
}

/// Serialize rule-set records into bundle bytes.
pub fn encode_bundle(records: &[RulesetRecord]) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(records).map_err(|e| DomainError::BundleDecode(e.to_string()))
}

/// Rewrite `$n` group references (n in 1..=9) to `${n}`.
///
/// The upstream corpus uses PCRE replacement syntax, where `$1xxx` means
/// group 1 followed by `xxx`. The regex crate reads `$1xxx` as the named
/// group `1xxx`, so the braces are required. Already-braced references pass
/// through untouched, which keeps the transformation idempotent, and `$10`
/// comes out as `${1}0` (group 1, then a literal zero).
pub fn normalize_replacement(to: &str) -> String {
    let mut out = String::with_capacity(to.len() + 8);
    let mut chars = to.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(&digit) = chars.peek() {
                if digit.is_ascii_digit() && digit != '0' {
                    chars.next();
                    out.push_str("${");
                    out.push(digit);
                    out.push('}');
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Compile bundle records into the two lookup indexes.
///
/// Disabled and mixedcontent-only records never reach an index. A rule set
/// containing any uncompilable pattern is discarded whole; rules whose
/// replacement would demote to `http:` are dropped individually. Duplicate
/// exact targets across rule sets share intent upstream, so last-writer-wins
/// on the plain map is fine.
pub fn compile_rule_index(records: &[RulesetRecord]) -> RuleIndex {
    let start = Instant::now();
    let mut plain = PlainIndex::with_capacity_and_hasher(records.len(), FxBuildHasher);
    let mut wildcard: WildcardIndex = Trie::new();
    let mut compiled = 0usize;
    let mut dropped = 0usize;

    for record in records {
        if record.is_disabled() || record.is_mixed_content_only() {
            continue;
        }

        let Some(ruleset) = compile_ruleset(record) else {
            dropped += 1;
            continue;
        };
        let ruleset = Arc::new(ruleset);
        compiled += 1;

        for target in &record.targets {
            match TargetHost::classify(&target.host) {
                Ok(TargetHost::Exact(host)) => {
                    plain.insert(CompactString::from(host), Arc::clone(&ruleset));
                }
                Ok(TargetHost::PrefixWildcard(suffix)) => {
                    wildcard.insert(reverse_host(&suffix), Arc::clone(&ruleset));
                }
                Ok(TargetHost::SuffixWildcard(prefix)) => {
                    wildcard.insert(prefix.into_bytes(), Arc::clone(&ruleset));
                }
                Err(err) => {
                    debug!(
                        ruleset = %record.name,
                        host = %target.host,
                        error = %err,
                        "skipping malformed target"
                    );
                }
            }
        }
    }

    let index = RuleIndex::new(plain, wildcard, compiled, dropped);
    info!(
        rulesets = compiled,
        dropped,
        plain = index.plain_len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "rule index compiled"
    );
    index
}

fn compile_ruleset(record: &RulesetRecord) -> Option<CompiledRuleset> {
    let mut exclusions = Vec::with_capacity(record.exclusions.len());
    for exclusion in &record.exclusions {
        match Regex::new(&exclusion.pattern) {
            Ok(pattern) => exclusions.push(Exclusion { pattern }),
            Err(err) => {
                debug!(
                    ruleset = %record.name,
                    pattern = %exclusion.pattern,
                    error = %err,
                    "exclusion failed to compile, dropping rule set"
                );
                return None;
            }
        }
    }

    let mut rules = Vec::with_capacity(record.rules.len());
    for rule in &record.rules {
        // A replacement back to plain HTTP would reintroduce mixed content.
        if rule.to.starts_with("http:") {
            continue;
        }
        match Regex::new(&rule.from) {
            Ok(from) => rules.push(Rule {
                from,
                to: normalize_replacement(&rule.to),
            }),
            Err(err) => {
                debug!(
                    ruleset = %record.name,
                    pattern = %rule.from,
                    error = %err,
                    "rule failed to compile, dropping rule set"
                );
                return None;
            }
        }
    }

    let ruleset = CompiledRuleset { exclusions, rules };
    if ruleset.is_empty() {
        debug!(ruleset = %record.name, "rule set compiled with no patterns");
    }
    Some(ruleset)
}
