use thiserror::Error;

/// Errors raised while normalizing raw trade input.
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("ambiguity: only one of buy amount or sell amount may be negative")]
    AmbiguousAmount,

    #[error("unknown trade kind: '{0}'")]
    UnknownKind(String),

    #[error("could not parse timestamp '{0}'")]
    Timestamp(String),
}
