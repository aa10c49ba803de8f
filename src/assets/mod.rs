//! Inputs to a card: colours, remote images, fonts and the logo.

/// Colour parsing.
pub mod color;
/// Image and SVG decoding.
pub mod decode;
/// Remote image retrieval.
pub mod fetch;
/// Font loading.
pub mod fonts;
/// Logo loading.
pub mod logo;
