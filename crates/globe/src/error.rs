use std::path::PathBuf;

use layers::LayerError;

#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error("invalid globe config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
