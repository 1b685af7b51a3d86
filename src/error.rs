//! Error types for fuzzy-valve

use thiserror::Error;

use crate::variable::Role;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error type
///
/// Construction errors (`InvalidShape` through `InvalidRule`) are reported before an
/// engine exists. `MissingInput`, `InvalidInput` and `NoRuleFired` are reported per call
/// and leave the engine usable.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed membership function parameters
    #[error("Invalid membership shape: {0}")]
    InvalidShape(String),

    /// Malformed universe of discourse
    #[error("Invalid universe: {0}")]
    InvalidUniverse(String),

    #[error("Term `{term}` is already defined on variable `{variable}`")]
    DuplicateTerm { variable: String, term: String },

    #[error("Variable `{0}` is already defined")]
    DuplicateVariable(String),

    #[error("Unknown term `{term}` on variable `{variable}`")]
    UnknownTerm { variable: String, term: String },

    #[error("Unknown variable `{0}`")]
    UnknownVariable(String),

    /// A variable was used in the wrong position of a rule or call
    #[error("Variable `{variable}` is not an {expected} variable")]
    RoleMismatch { variable: String, expected: Role },

    #[error("Rule has no consequent terms")]
    EmptyConsequent,

    #[error("Invalid rule weight: {0}")]
    InvalidWeight(f64),

    /// Malformed rule expression at the configuration boundary
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Missing input for variable `{0}`")]
    MissingInput(String),

    #[error("Invalid input {value} for variable `{variable}`")]
    InvalidInput { variable: String, value: f64 },

    /// The aggregated output set for a variable has zero mass
    #[error("No rule fired for variable `{0}`")]
    NoRuleFired(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid shape error
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Error::InvalidShape(msg.into())
    }

    /// Create an invalid universe error
    pub fn invalid_universe(msg: impl Into<String>) -> Self {
        Error::InvalidUniverse(msg.into())
    }

    /// Create an invalid rule error
    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Error::InvalidRule(msg.into())
    }

    pub(crate) fn unknown_term(variable: &str, term: &str) -> Self {
        Error::UnknownTerm {
            variable: variable.to_owned(),
            term: term.to_owned(),
        }
    }

    /// True for errors that only concern a single `compute` call
    pub fn is_per_call(&self) -> bool {
        matches!(
            self,
            Error::MissingInput(_) | Error::InvalidInput { .. } | Error::NoRuleFired(_)
        )
    }
}

#[test]
fn test_per_call_classification() {
    assert!(Error::MissingInput("fluxo".into()).is_per_call());
    assert!(Error::NoRuleFired("abertura".into()).is_per_call());
    assert!(!Error::invalid_shape("a > b").is_per_call());
    assert!(!Error::EmptyConsequent.is_per_call());
}
