use serde::{Deserialize, Serialize};

/// Platform tag for rule sets that only apply where mixed content is allowed.
/// We never run on such a platform, so these rule sets are inert.
pub const MIXED_CONTENT_PLATFORM: &str = "mixedcontent";

/// A target host specification as written in the upstream corpus: exact
/// (`www.example.com`), prefix wildcard (`*.example.com`) or suffix wildcard
/// (`example.*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetRecord {
    pub host: String,
}

/// A regular expression over the full URL string. A match anywhere in the URL
/// suppresses the enclosing rule set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionRecord {
    pub pattern: String,
}

/// One rewrite rule: `from` is a regular expression over the full URL string,
/// `to` a replacement template with `$1`..`$9` back-references.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleRecord {
    pub from: String,
    pub to: String,
}

/// One serialized rule-set record as shipped in the bundle.
///
/// Compiled regular expressions are never serialized; the engine recompiles
/// every pattern at load time. Ordering of `exclusions` and `rules` is
/// preserved from the bundle and is significant (evaluation is first-match).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulesetRecord {
    /// Upstream rule-set name, carried for log context only.
    #[serde(default)]
    pub name: String,

    /// Non-empty means the rule set is turned off upstream (the value is the
    /// stated reason).
    #[serde(default)]
    pub default_off: String,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub targets: Vec<TargetRecord>,

    #[serde(default)]
    pub exclusions: Vec<ExclusionRecord>,

    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

impl RulesetRecord {
    pub fn is_disabled(&self) -> bool {
        !self.default_off.is_empty()
    }

    pub fn is_mixed_content_only(&self) -> bool {
        self.platform == MIXED_CONTENT_PLATFORM
    }
}
