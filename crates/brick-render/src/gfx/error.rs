/// Failure reported by a graphics context while building a program.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContextError {
    #[error("{stage} shader failed to compile: {message}")]
    Compile { stage: &'static str, message: String },
    #[error("program failed to link: {0}")]
    Link(String),
}

/// Why a renderer could not be brought up.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InitError {
    #[error("no drawing surface named `{0}`")]
    SurfaceNotFound(String),
    #[error("surface `{surface}` cannot provide a graphics context: {reason}")]
    ContextUnavailable { surface: String, reason: String },
    #[error(transparent)]
    Program(#[from] ContextError),
    #[error("linked program has no `{0}` input")]
    MissingLocation(&'static str),
}
