use crate::CanonicalImage;
use common::span;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("empty image payload")]
    Empty,

    #[error("{0}")]
    Image(#[from] image::ImageError),
}

/// Decode an encoded image (PNG, JPEG, GIF, BMP, WebP, ...) into RGB8.
///
/// The format is guessed from the content, never from a declared content
/// type. Gray, palette, 16-bit and alpha layouts are all flattened to three
/// 8-bit channels; transparency is dropped.
pub fn decode(bytes: &[u8]) -> Result<CanonicalImage, DecodeError> {
    let _s = span!("decode");

    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let decoded = image::load_from_memory(bytes)?;

    tracing::trace!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded source image"
    );

    Ok(CanonicalImage::from(decoded.into_rgb8()))
}
