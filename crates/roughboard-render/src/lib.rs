//! Roughboard Render Library
//!
//! Rendering pipeline for the Roughboard canvas: seeded hand-drawn outlines,
//! selection decorations and text, painted through a small [`Surface`] trait.
//! The default backend rasterizes into a tiny-skia pixmap; a Vello scene
//! backend is available behind the `vello-renderer` feature.

mod pipeline;
mod renderer;
pub mod rough;
pub mod text;

#[cfg(feature = "skia-renderer")]
mod skia_impl;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use pipeline::{paint_element, paint_scene};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, Surface};
pub use rough::{RoughGenerator, RoughOutline, element_outline};
pub use text::{load_font, text_path};

#[cfg(feature = "skia-renderer")]
pub use skia_impl::PixmapRenderer;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
