use thiserror::Error;

use crate::sink::SinkError;

/// Everything that can go wrong between reading the KML file and handing a
/// feature to the sink.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The document could not be read or parsed at all. Fatal: no output
    /// collection is created when this happens.
    #[error("failed to read or parse KML: {0}")]
    ParseFailure(String),

    /// A required child tag was absent on an element.
    #[error("missing required <{0}> tag")]
    MissingField(&'static str),

    /// A coordinate field was present but not numeric, or a coordinate string
    /// had fewer than two comma-separated tokens.
    #[error("malformed coordinate value {0:?}")]
    MalformedCoordinate(String),

    /// The geometry store rejected a create, insert, or finish operation.
    #[error(transparent)]
    Sink(#[from] SinkError),
}
