use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to capture surface: {0}")]
    Capture(String),
    #[error("failed to decode snapshot: {0}")]
    Decode(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    /// The embedded document cannot be read, usually because it is cross-origin.
    #[error("vector document is not accessible")]
    Inaccessible,
    #[error("bounding box unavailable for {0}")]
    NoBoundingBox(String),
    #[error("vector scene error: {0}")]
    Backend(String),
}
