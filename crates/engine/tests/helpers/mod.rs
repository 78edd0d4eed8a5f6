#![allow(dead_code)]

use httpse_domain::{ExclusionRecord, RuleRecord, RulesetRecord, TargetRecord};

/// Builder for rule-set records in tests.
pub struct RulesetBuilder {
    record: RulesetRecord,
}

pub fn ruleset(name: &str) -> RulesetBuilder {
    RulesetBuilder {
        record: RulesetRecord {
            name: name.to_string(),
            ..Default::default()
        },
    }
}

impl RulesetBuilder {
    pub fn target(mut self, host: &str) -> Self {
        self.record.targets.push(TargetRecord {
            host: host.to_string(),
        });
        self
    }

    pub fn exclusion(mut self, pattern: &str) -> Self {
        self.record.exclusions.push(ExclusionRecord {
            pattern: pattern.to_string(),
        });
        self
    }

    pub fn rule(mut self, from: &str, to: &str) -> Self {
        self.record.rules.push(RuleRecord {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    pub fn default_off(mut self, reason: &str) -> Self {
        self.record.default_off = reason.to_string();
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.record.platform = platform.to_string();
        self
    }

    pub fn build(self) -> RulesetRecord {
        self.record
    }
}

/// The common case: `^http:` → `https:` over a list of targets.
pub fn http_upgrade(name: &str, hosts: &[&str]) -> RulesetRecord {
    let mut builder = ruleset(name);
    for host in hosts {
        builder = builder.target(host);
    }
    builder.rule("^http:", "https:").build()
}
