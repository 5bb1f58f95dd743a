/// Error types for capability operations.
#[derive(Debug, thiserror::Error)]
pub enum CapError {
    #[error("malformed capability: {0}")]
    MalformedCapability(String),
    #[error("unsupported capability type: {0}")]
    UnsupportedCapabilityType(String),
    #[error("invalid {part}: {source}")]
    InvalidPart {
        part: &'static str,
        #[source]
        source: captool_primitives::PrimitivesError,
    },
    #[error("expected at least 24 words, got {got}")]
    WordCount { got: usize },
    #[error("primitives error: {0}")]
    Primitives(#[from] captool_primitives::PrimitivesError),
}
