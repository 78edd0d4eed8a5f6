use crate::compiler::{compile_rule_index, decode_bundle};
use crate::index::RuleIndex;
use crate::stats::{RewriteStats, StatsEmitter};
use arc_swap::ArcSwap;
use httpse_domain::{DomainError, EngineConfig, RulesetRecord};
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::error;
use url::Url;

/// The embedded rule-set bundle: one opaque blob of serialized records.
pub static EMBEDDED_RULESETS: &[u8] = include_bytes!("../assets/rulesets");

static SHARED: OnceLock<Arc<Rewriter>> = OnceLock::new();

/// The URL rewrite engine.
///
/// All lookup state is two immutable indexes behind one `ArcSwap`: readers
/// load the current tables once per call, the builder publishes by a single
/// atomic store. Until the background build publishes, every query answers
/// `("", false)` from the empty tables.
pub struct Rewriter {
    index: ArcSwap<RuleIndex>,
    stats: StatsEmitter,
    wildcard_fallback: bool,
}

impl Rewriter {
    /// An engine with empty indexes and no stats consumer.
    pub fn empty(config: &EngineConfig) -> Self {
        Self {
            index: ArcSwap::from_pointee(RuleIndex::empty()),
            stats: StatsEmitter::disabled(),
            wildcard_fallback: config.wildcard_fallback,
        }
    }

    /// Build synchronously from caller-provided records.
    ///
    /// Intended for tests and offline tooling; timing samples are not
    /// collected.
    pub fn with_rulesets(records: &[RulesetRecord], config: &EngineConfig) -> Self {
        let rewriter = Self::empty(config);
        rewriter.install_rulesets(records);
        rewriter
    }

    /// Build synchronously from the embedded bundle.
    pub fn embedded_blocking(config: &EngineConfig) -> Result<Self, DomainError> {
        let records = decode_bundle(EMBEDDED_RULESETS)?;
        Ok(Self::with_rulesets(&records, config))
    }

    /// Default construction: returns immediately with empty indexes and
    /// populates them on a background task, published by one atomic store.
    /// The stats consumer is spawned alongside when enabled. Requires a tokio
    /// runtime.
    pub fn spawn_embedded(config: &EngineConfig) -> Arc<Self> {
        let stats = if config.stats.enabled {
            let (emitter, aggregator) = StatsEmitter::bounded(config.stats.queue_capacity);
            tokio::spawn(aggregator.run());
            emitter
        } else {
            StatsEmitter::disabled()
        };

        let rewriter = Arc::new(Self {
            index: ArcSwap::from_pointee(RuleIndex::empty()),
            stats,
            wildcard_fallback: config.wildcard_fallback,
        });

        let handle = Arc::clone(&rewriter);
        tokio::spawn(async move {
            match decode_bundle(EMBEDDED_RULESETS) {
                Ok(records) => handle.install_rulesets(&records),
                Err(err) => {
                    // Queries keep answering misses from the empty tables.
                    error!(error = %err, "embedded bundle failed to decode");
                }
            }
        });

        rewriter
    }

    /// Process-wide rewriter seeded from the embedded bundle.
    ///
    /// The first call triggers the async build; later calls return the same
    /// instance and never re-run deserialization.
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Self::spawn_embedded(&EngineConfig::default())))
    }

    /// Compile `records` and publish the result as one atomic store.
    pub fn install_rulesets(&self, records: &[RulesetRecord]) {
        let index = compile_rule_index(records);
        self.index.store(Arc::new(index));
    }

    pub fn compiled_ruleset_count(&self) -> usize {
        self.index.load().compiled_rulesets
    }

    /// Aggregated timings, or `None` when stats are disabled.
    pub async fn stats(&self) -> Option<RewriteStats> {
        self.stats.snapshot().await
    }

    /// Rewrite `url` according to the loaded rule sets.
    ///
    /// Returns `(rewritten, true)` when a rule fired and `("", false)`
    /// otherwise; on a miss the caller keeps its original URL. Only plain
    /// `http` URLs are considered. A timing sample is emitted on every path
    /// past the scheme guard, misses included.
    pub fn rewrite(&self, url: &Url) -> (String, bool) {
        if url.scheme() != "http" {
            return (String::new(), false);
        }

        let start = Instant::now();
        let result = self.lookup_and_apply(url);
        self.stats
            .emit(url.host_str().unwrap_or_default(), start.elapsed());
        result
    }

    /// Lookup stages in cost order: the exact map is the most specific and a
    /// hash probe is cheapest; prefix wildcards next, because a plain miss
    /// plus a reversed-host radix hit is the common subdomain-of-a-covered-
    /// root path; suffix wildcards are far rarer and go last.
    ///
    /// Once a stage selects a rule set, its verdict is final: an exclusion
    /// or an absent rule does not fall through to the next stage unless the
    /// `wildcard_fallback` knob is on.
    fn lookup_and_apply(&self, url: &Url) -> (String, bool) {
        let Some(host) = url.host_str() else {
            return (String::new(), false);
        };
        // Rule-set authors write ports into their targets when they mean
        // them, so the lookup key keeps the port.
        let host: Cow<'_, str> = match url.port() {
            Some(port) => Cow::Owned(format!("{host}:{port}")),
            None => Cow::Borrowed(host),
        };
        let url_str = url.as_str();
        let index = self.index.load();

        if let Some(ruleset) = index.lookup_exact(&host) {
            if let Some(rewritten) = ruleset.apply(url_str) {
                return (rewritten, true);
            }
            if !self.wildcard_fallback {
                return (String::new(), false);
            }
        }

        if let Some(ruleset) = index.lookup_prefix_wildcard(&host) {
            if let Some(rewritten) = ruleset.apply(url_str) {
                return (rewritten, true);
            }
            if !self.wildcard_fallback {
                return (String::new(), false);
            }
        }

        if let Some(ruleset) = index.lookup_suffix_wildcard(&host) {
            if let Some(rewritten) = ruleset.apply(url_str) {
                return (rewritten, true);
            }
        }

        (String::new(), false)
    }
}
