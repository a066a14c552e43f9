use std::path::PathBuf;

/// Boxed error returned by a [`UtilityEngine`](crate::UtilityEngine).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The utility engine failed while checking a candidate token. Aborts the
    /// whole transform.
    #[error("utility engine failed on token `{token}`")]
    Engine {
        token: String,
        #[source]
        source: BoxError,
    },

    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
