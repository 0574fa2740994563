//! Scene encoder trait and shared types.
//!
//! The [`SceneEncoder`] trait turns a composed [`Scene`] into encoded image
//! bytes. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): tiny-skia for
//! rasterization, median-cut palette quantization, and the `image` crate's
//! PNG encoder. Everything is pure Rust and statically linked.
//!
//! The batch driver only sees the trait, so tests can swap in a mock that
//! records scenes instead of rasterizing them.

use super::scene::Scene;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid glyph geometry in '{0}'")]
    InvalidPath(String),
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Trait for scene encoders.
///
/// `Sync` because bulk runs share one encoder across rayon workers.
pub trait SceneEncoder: Sync {
    /// Rasterize and encode a scene. The output dimensions always equal the
    /// scene's canvas size.
    fn encode(&self, scene: Scene) -> Result<Vec<u8>, BackendError>;
}
