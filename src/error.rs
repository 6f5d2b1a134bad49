use crate::range::ParamName;
use thiserror::Error;

/// Reason a single specification string failed to parse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseIssue {
    #[error("invalid integer suffix")]
    BadSuffix,

    #[error("missing integer digits")]
    EmptyInteger,

    #[error("integer out of range")]
    Overflow,

    #[error("malformed range: expected start-end")]
    MalformedRange,
}

#[derive(Error, Debug)]
pub enum CalcError {
    /// A specification string does not match its parameter's grammar.
    #[error("parameter {param}: cannot parse '{value}': {issue}")]
    Parse {
        param: ParamName,
        value: String,
        #[source]
        issue: ParseIssue,
    },

    /// One or more required parameters were never supplied.
    #[error("missing required parameters: {}", .0.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", "))]
    MissingRequired(Vec<ParamName>),

    /// A supplied parameter name is outside the fixed vocabulary.
    #[error("unrecognized parameter: {0}")]
    UnrecognizedParameter(String),

    /// A compiled domain reached a stage that cannot handle its shape.
    /// Indicates a bug in the range compiler, not bad user input.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalcError>;
