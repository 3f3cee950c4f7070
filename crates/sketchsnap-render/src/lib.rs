//! SketchSnap Render Library
//!
//! Renderer abstraction and a software rasteriser for SketchSnap paint lists,
//! plus the icon asset store images are drawn from.

pub mod assets;
mod raster;
mod renderer;

pub use assets::{AssetError, AssetEvent, AssetNotifier, AssetSource, AssetStatus, AssetStore, FileAssetSource};
pub use raster::{PngRenderResult, SoftwareRenderer, encode_png};
pub use renderer::{FrameStats, RenderContext, RenderResult, Renderer, RendererError};
