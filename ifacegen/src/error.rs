use std::path::PathBuf;

/// Errors that stop an extraction run.
///
/// Everything recoverable (unmapped types, unknown conversions, suspicious argument types)
/// is reported through [`Diagnostics`](crate::Diagnostics) instead and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The frontend could not produce a translation unit for a file
    #[error("failed to parse {}: {message}", path.display())]
    Frontend { path: PathBuf, message: String },

    /// The compiler queried for its system include directories could not be run
    #[error("failed to run `{compiler}` to discover system include paths: {source}")]
    IncludeDiscovery {
        compiler: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Two distinct native classes derive the same target type name
    #[error("target type name `{target}` is already taken by `{existing}`, refusing to merge `{incoming}` into it")]
    TargetNameCollision {
        target: String,
        existing: String,
        incoming: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
