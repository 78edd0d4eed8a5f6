use regex::Regex;

/// One compiled rewrite rule: the match expression over the full URL string
/// and the replacement template it expands.
#[derive(Debug)]
pub struct Rule {
    pub from: Regex,
    /// Replacement template, normalized to `${n}` group references.
    pub to: String,
}

/// A compiled exclusion pattern.
#[derive(Debug)]
pub struct Exclusion {
    pub pattern: Regex,
}

/// A compiled rule set: exclusions and rules in bundle order.
///
/// Shared between both indexes via `Arc`; a rule set with several targets is
/// compiled once.
#[derive(Debug, Default)]
pub struct CompiledRuleset {
    pub exclusions: Vec<Exclusion>,
    pub rules: Vec<Rule>,
}

impl CompiledRuleset {
    /// Evaluate this rule set against `url`.
    ///
    /// Exclusions run first, in insertion order: any match anywhere in the
    /// URL suppresses the rewrite. Rules are first-match-wins. The match is a
    /// substring find and the replacement substitutes every occurrence;
    /// upstream patterns anchor at `^`, so in practice exactly one.
    pub fn apply(&self, url: &str) -> Option<String> {
        for exclusion in &self.exclusions {
            if exclusion.pattern.is_match(url) {
                return None;
            }
        }
        for rule in &self.rules {
            if rule.from.is_match(url) {
                return Some(rule.from.replace_all(url, rule.to.as_str()).into_owned());
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty() && self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &str, to: &str) -> Rule {
        Rule {
            from: Regex::new(from).unwrap(),
            to: to.to_string(),
        }
    }

    fn exclusion(pattern: &str) -> Exclusion {
        Exclusion {
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    #[test]
    fn test_simple_upgrade() {
        let ruleset = CompiledRuleset {
            exclusions: vec![],
            rules: vec![rule("^http:", "https:")],
        };
        assert_eq!(
            ruleset.apply("http://example.com/").as_deref(),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_exclusion_takes_precedence() {
        let ruleset = CompiledRuleset {
            exclusions: vec![exclusion("^http://example\\.com/login/")],
            rules: vec![rule("^http:", "https:")],
        };
        assert_eq!(ruleset.apply("http://example.com/login/2fa"), None);
        assert_eq!(
            ruleset.apply("http://example.com/home").as_deref(),
            Some("https://example.com/home")
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let ruleset = CompiledRuleset {
            exclusions: vec![],
            rules: vec![
                rule("^http://www\\.", "https://www."),
                rule("^http:", "https://fallback."),
            ],
        };
        assert_eq!(
            ruleset.apply("http://www.example.com/").as_deref(),
            Some("https://www.example.com/")
        );
        assert_eq!(
            ruleset.apply("http://example.com/").as_deref(),
            Some("https://fallback.//example.com/")
        );
    }

    #[test]
    fn test_capture_group_substitution() {
        let ruleset = CompiledRuleset {
            exclusions: vec![],
            rules: vec![rule(
                "^http://(\\w{2})\\.wikipedia\\.org/wiki/",
                "https://secure.wikimedia.org/wikipedia/${1}/wiki/",
            )],
        };
        assert_eq!(
            ruleset.apply("http://fr.wikipedia.org/wiki/Chose").as_deref(),
            Some("https://secure.wikimedia.org/wikipedia/fr/wiki/Chose")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let ruleset = CompiledRuleset {
            exclusions: vec![],
            rules: vec![rule("^http://only\\.this\\.host/", "https://only.this.host/")],
        };
        assert_eq!(ruleset.apply("http://other.host/"), None);
    }
}
