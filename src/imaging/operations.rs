//! High-level card operations.
//!
//! These functions combine scene composition with encoder execution. They
//! take the immutable typefaces and render config, build the scene, and hand
//! it to the encoder.

use super::backend::{BackendError, SceneEncoder};
use super::scene::compose;
use super::typeface::{TypefaceError, TypefaceSet};
use crate::config::RenderConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font error: {0}")]
    Font(#[from] TypefaceError),
    #[error("Encode error: {0}")]
    Encode(#[from] BackendError),
}

/// Result type for card operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// The variable text of one card. The site title comes from [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardText<'a> {
    pub subtitle: Option<&'a str>,
    pub headline: &'a str,
}

/// Compose and encode a card, returning the encoded bytes.
pub fn render_card(
    encoder: &impl SceneEncoder,
    typefaces: &TypefaceSet,
    config: &RenderConfig,
    text: CardText<'_>,
) -> Result<Vec<u8>> {
    let scene = compose(
        &config.site_title,
        text.subtitle,
        text.headline,
        config,
        typefaces,
    )?;
    Ok(encoder.encode(scene)?)
}
