use crate::errors::DomainError;

/// A classified target host specification.
///
/// The wildcard shapes keep their anchoring dot: the dot is what stops
/// `evil-example.com` from matching `*.example.com` once the suffix is used
/// as a radix-tree key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetHost {
    /// `www.example.com`
    Exact(String),
    /// Literal suffix of a `*.`-prefixed target, leading dot retained
    /// (`*.example.com` → `.example.com`).
    PrefixWildcard(String),
    /// Literal prefix of a `.*`-suffixed target, trailing dot retained
    /// (`example.*` → `example.`).
    SuffixWildcard(String),
}

impl TargetHost {
    /// Classify a target host string from the bundle.
    ///
    /// Interior wildcards, multiple wildcards, empty hosts and wildcards not
    /// sitting at a label boundary are rejected; the caller decides whether
    /// that discards the target or the whole rule set.
    pub fn classify(host: &str) -> Result<Self, DomainError> {
        if host.is_empty() {
            return Err(DomainError::EmptyTargetHost);
        }

        match host.bytes().filter(|b| *b == b'*').count() {
            0 => Ok(TargetHost::Exact(host.to_string())),
            1 if host.starts_with('*') => {
                let suffix = &host[1..];
                if !suffix.starts_with('.') {
                    return Err(DomainError::UnanchoredWildcard(host.to_string()));
                }
                Ok(TargetHost::PrefixWildcard(suffix.to_string()))
            }
            1 if host.ends_with('*') => {
                let prefix = &host[..host.len() - 1];
                if !prefix.ends_with('.') {
                    return Err(DomainError::UnanchoredWildcard(host.to_string()));
                }
                Ok(TargetHost::SuffixWildcard(prefix.to_string()))
            }
            1 => Err(DomainError::InteriorWildcard(host.to_string())),
            _ => Err(DomainError::MultipleWildcards(host.to_string())),
        }
    }
}
