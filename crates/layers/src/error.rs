use foundation::LayerId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("unknown layer type: {0:?}")]
    UnknownLayerType(String),
    #[error("unknown layer category: {0:?}")]
    UnknownCategory(String),
    #[error("invalid layer argument: {0}")]
    InvalidLayerArgument(String),
    #[error("layer {0} is not attached")]
    LayerNotFound(LayerId),
}
