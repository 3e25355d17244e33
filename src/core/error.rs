use thiserror::Error;

#[derive(Error, Debug)]
pub enum LsysError {
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Unknown L-system: {0}")]
    UnknownSystem(String),

    #[error("Incomplete grammar: {0}")]
    IncompleteGrammar(String),

    #[error("Derivation depth {requested} exceeds the maximum of {max}; reduce the iteration count")]
    DepthExceeded { requested: u32, max: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LsysError>;
