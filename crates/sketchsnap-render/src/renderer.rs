//! Renderer trait abstraction.

use crate::assets::AssetStore;
use kurbo::Size;
use peniko::Color;
use sketchsnap_core::icons::IconRef;
use sketchsnap_core::paint::DrawInstruction;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Viewport is empty: {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    #[error("Could not allocate a {width}x{height} frame")]
    Allocation { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Paint list to draw, back to front.
    pub instructions: &'a [DrawInstruction],
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Decoded icon images. Without a store every image is deferred.
    pub assets: Option<&'a AssetStore>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(instructions: &'a [DrawInstruction], viewport_size: Size) -> Self {
        Self {
            instructions,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            assets: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the asset store images are drawn from.
    pub fn with_assets(mut self, assets: &'a AssetStore) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Output size in physical pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = (self.viewport_size.width * self.scale_factor).round().max(0.0) as u32;
        let height = (self.viewport_size.height * self.scale_factor).round().max(0.0) as u32;
        (width, height)
    }
}

/// What a frame drew and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub paths: usize,
    pub images: usize,
    /// Images whose asset has not finished loading. They appear once the
    /// asset store reports them ready and the frame is drawn again.
    pub deferred: Vec<IconRef>,
    /// Images whose asset failed to load; drawn as placeholders.
    pub failed: Vec<IconRef>,
}

impl FrameStats {
    pub fn is_complete(&self) -> bool {
        self.deferred.is_empty()
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Draw one frame from the context's paint list.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<FrameStats>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
