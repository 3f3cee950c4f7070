//! CPU rasteriser producing RGBA pixels from a paint list.
//!
//! Drawing goes through `tiny-skia`: strokes are anti-aliased with round caps
//! and joins, and icons are drawn nearest-neighbour into their destination
//! rectangle. The finished frame is kept as straight (non-premultiplied) RGBA.

use crate::assets::AssetStatus;
use crate::renderer::{FrameStats, RenderContext, RenderResult, Renderer, RendererError};
use image::RgbaImage;
use kurbo::{BezPath, Cap, Join, PathEl};
use sketchsnap_core::elements::Rgba;
use sketchsnap_core::paint::{DrawInstruction, ImageInstruction, PathInstruction};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Transform,
};

/// Placeholder fill for images that failed to load.
const PLACEHOLDER: Rgba = Rgba::new(200, 200, 200, 255);

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// Encode as a PNG file.
    pub fn encode(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.rgba_data, self.width, self.height)
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

/// Software renderer drawing into an owned RGBA buffer.
#[derive(Debug, Default)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels of the last frame, RGBA, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)` in the last frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Render a frame and hand back a copy of its pixels.
    pub fn render_to_png(&mut self, ctx: &RenderContext) -> RenderResult<(PngRenderResult, FrameStats)> {
        let stats = self.build_scene(ctx)?;
        let result = PngRenderResult {
            rgba_data: self.pixels.clone(),
            width: self.width,
            height: self.height,
        };
        Ok((result, stats))
    }

    fn finish_frame(&mut self, pixmap: &Pixmap) {
        self.width = pixmap.width();
        self.height = pixmap.height();
        self.pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
    }
}

impl Renderer for SoftwareRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<FrameStats> {
        let (width, height) = ctx.pixel_size();
        if width == 0 || height == 0 {
            return Err(RendererError::EmptyViewport { width, height });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RendererError::Allocation { width, height })?;
        let background: Rgba = self.background_color(ctx).into();
        pixmap.fill(tiny_skia::Color::from_rgba8(background.r, background.g, background.b, background.a));

        let scale = ctx.scale_factor as f32;
        let transform = Transform::from_scale(scale, scale);
        let mut stats = FrameStats::default();
        for instruction in ctx.instructions {
            match instruction {
                DrawInstruction::Path(path) => {
                    draw_path(&mut pixmap, path, transform);
                    stats.paths += 1;
                }
                DrawInstruction::Image(image) => {
                    let status = ctx
                        .assets
                        .map_or(AssetStatus::Unknown, |assets| assets.status(&image.asset));
                    match (status, ctx.assets.and_then(|assets| assets.image(&image.asset))) {
                        (_, Some(pixels)) => {
                            draw_image(&mut pixmap, image, pixels, scale);
                            stats.images += 1;
                        }
                        (AssetStatus::Failed, None) => {
                            draw_placeholder(&mut pixmap, image, transform);
                            stats.failed.push(image.asset.clone());
                        }
                        _ => stats.deferred.push(image.asset.clone()),
                    }
                }
            }
        }

        self.finish_frame(&pixmap);
        if !stats.is_complete() {
            log::debug!("{} image(s) deferred until their assets load", stats.deferred.len());
        }
        Ok(stats)
    }
}

fn solid_paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn draw_path(pixmap: &mut Pixmap, path: &PathInstruction, transform: Transform) {
    let Some(&first) = path.points.first() else {
        return;
    };
    let paint = solid_paint(path.color);

    // A stroke that never leaves its first point is drawn as a round dot.
    if path.points.iter().all(|&p| p == first) {
        let radius = (path.width / 2.0) as f32;
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, radius) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    let Some(outline) = skia_path(&path.to_bez_path()) else {
        return;
    };
    pixmap.stroke_path(&outline, &paint, &skia_stroke(&path.stroke_style()), transform, None);
}

fn draw_image(pixmap: &mut Pixmap, image: &ImageInstruction, pixels: &RgbaImage, scale: f32) {
    let (img_w, img_h) = pixels.dimensions();
    if image.width <= 0.0 || image.height <= 0.0 {
        return;
    }
    let Some(icon) = icon_pixmap(pixels) else {
        return;
    };
    let sx = (image.width / f64::from(img_w)) as f32 * scale;
    let sy = (image.height / f64::from(img_h)) as f32 * scale;
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, image.x as f32 * scale, image.y as f32 * scale);
    let paint = PixmapPaint {
        quality: FilterQuality::Nearest,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, icon.as_ref(), &paint, transform, None);
}

fn draw_placeholder(pixmap: &mut Pixmap, image: &ImageInstruction, transform: Transform) {
    let Some(rect) = tiny_skia::Rect::from_xywh(
        image.x as f32,
        image.y as f32,
        image.width as f32,
        image.height as f32,
    ) else {
        return;
    };
    pixmap.fill_rect(rect, &solid_paint(PLACEHOLDER), transform, None);
}

/// Copy decoded icon pixels into a premultiplied pixmap.
fn icon_pixmap(pixels: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(pixels.width(), pixels.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(pixels.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn skia_stroke(style: &kurbo::Stroke) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: style.width as f32,
        miter_limit: style.miter_limit as f32,
        line_cap: match style.start_cap {
            Cap::Butt => LineCap::Butt,
            Cap::Square => LineCap::Square,
            Cap::Round => LineCap::Round,
        },
        line_join: match style.join {
            Join::Bevel => LineJoin::Bevel,
            Join::Miter => LineJoin::Miter,
            Join::Round => LineJoin::Round,
        },
        dash: None,
    }
}
