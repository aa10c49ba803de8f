//! CPU rendering: raster buffers, primitives, compositing and encoding.

/// Rating badge sub-composite.
pub mod badge;
/// Layer compositor.
pub mod composite;
/// PNG and WebP output.
pub mod encode;
/// Premultiplied RGBA8 buffers.
pub mod raster;
/// Rounded-rect and overlay primitives.
pub mod shapes;
/// Text blocks.
pub mod text;
