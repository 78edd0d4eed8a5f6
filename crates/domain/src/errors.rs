use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Could not decode ruleset bundle: {0}")]
    BundleDecode(String),

    #[error("Empty target host")]
    EmptyTargetHost,

    #[error("Interior wildcard in target host: {0}")]
    InteriorWildcard(String),

    #[error("Multiple wildcards in target host: {0}")]
    MultipleWildcards(String),

    #[error("Wildcard not anchored at a label boundary: {0}")]
    UnanchoredWildcard(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
