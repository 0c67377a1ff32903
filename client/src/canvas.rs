use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drawboard_shared::Point;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData, Window};

use crate::geometry::backing_size;
use crate::raster::{DeferredPaint, ImageCache};
use crate::renderer::{Renderer, Snapshot, Surface, SurfaceError};

const IMAGE_CACHE_BYTES: usize = 128 * 1024 * 1024;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Rc<Cell<(f64, f64)>>,
    images: RefCell<ImageCache<ImageData>>,
    deferred: Rc<RefCell<DeferredPaint<CanvasRenderingContext2d>>>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Ok(Self {
            canvas,
            ctx,
            size: Rc::new(Cell::new((0.0, 0.0))),
            images: RefCell::new(ImageCache::new(IMAGE_CACHE_BYTES)),
            deferred: Rc::new(RefCell::new(DeferredPaint::new())),
        })
    }

    pub fn resize(&mut self, window: &Window) {
        let rect = self.canvas.get_bounding_client_rect();
        let dpr = window.device_pixel_ratio();
        let (width, height) = backing_size(rect.width(), rect.height(), dpr);
        if width == self.canvas.width() && height == self.canvas.height() {
            let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
            self.size.set((rect.width(), rect.height()));
            return;
        }

        let kept = if self.canvas.width() > 0 && self.canvas.height() > 0 {
            self.read_pixels().ok()
        } else {
            None
        };
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.size.set((rect.width(), rect.height()));
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");

        if let Some(pixels) = kept {
            let _ = self.ctx.put_image_data(&pixels, 0.0, 0.0);
        }
    }

    fn read_pixels(&self) -> Result<ImageData, JsValue> {
        self.ctx.get_image_data(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        )
    }

    fn paint(&self, op: impl FnOnce(&CanvasRenderingContext2d) + 'static) {
        self.deferred.borrow_mut().paint(&self.ctx, op);
    }

    fn clear_all(ctx: &CanvasRenderingContext2d, (width, height): (f64, f64)) {
        ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn decode(&self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        let image =
            HtmlImageElement::new().map_err(|error| SurfaceError::Restore(format!("{error:?}")))?;
        let generation = self.deferred.borrow_mut().begin(snapshot.clone());

        {
            let deferred = self.deferred.clone();
            let ctx = self.ctx.clone();
            let size = self.size.clone();
            let loaded = image.clone();
            let onload = Closure::once_into_js(move || {
                let mut deferred = deferred.borrow_mut();
                if !deferred.is_current(generation) {
                    return;
                }
                let (width, height) = size.get();
                Self::clear_all(&ctx, (width, height));
                if let Err(error) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &loaded, 0.0, 0.0, width, height,
                ) {
                    warn!("Failed to draw restored image: {error:?}");
                }
                deferred.finish(generation, &ctx);
            });
            image.set_onload(Some(onload.unchecked_ref()));
        }

        {
            let deferred = self.deferred.clone();
            let ctx = self.ctx.clone();
            let onerror = Closure::once_into_js(move || {
                warn!("Saved image could not be decoded");
                deferred.borrow_mut().finish(generation, &ctx);
            });
            image.set_onerror(Some(onerror.unchecked_ref()));
        }

        image.set_src(snapshot.as_encoded());
        Ok(())
    }
}

fn begin_stroke(ctx: &CanvasRenderingContext2d, color: &str, width: f64) {
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    ctx.begin_path();
}

impl Renderer for CanvasSurface {
    fn stroke_line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        let color = color.to_string();
        self.paint(move |ctx| {
            begin_stroke(ctx, &color, width);
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        });
    }

    fn stroke_rect(&mut self, origin: Point, width: f64, height: f64, color: &str, line_width: f64) {
        let color = color.to_string();
        self.paint(move |ctx| {
            begin_stroke(ctx, &color, line_width);
            ctx.stroke_rect(origin.x, origin.y, width, height);
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) {
        let color = color.to_string();
        self.paint(move |ctx| {
            begin_stroke(ctx, &color, width);
            let _ = ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0);
            ctx.stroke();
        });
    }

    fn stroke_polygon(&mut self, vertices: &[Point], color: &str, width: f64) {
        let Some((first, rest)) = vertices.split_first() else {
            return;
        };
        let (first, rest, color) = (*first, rest.to_vec(), color.to_string());
        self.paint(move |ctx| {
            begin_stroke(ctx, &color, width);
            ctx.move_to(first.x, first.y);
            for vertex in &rest {
                ctx.line_to(vertex.x, vertex.y);
            }
            ctx.close_path();
            ctx.stroke();
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, font_size: f64, color: &str) {
        let (text, color) = (text.to_string(), color.to_string());
        self.paint(move |ctx| {
            ctx.set_font(&format!("{font_size}px Arial"));
            ctx.set_fill_style_str(&color);
            let _ = ctx.fill_text(&text, at.x, at.y);
        });
    }

    fn clear_rect(&mut self, origin: Point, width: f64, height: f64) {
        self.paint(move |ctx| ctx.clear_rect(origin.x, origin.y, width, height));
    }
}

impl Surface for CanvasSurface {
    fn capture(&self) -> Result<Snapshot, SurfaceError> {
        if let Some(result) = self.deferred.borrow().capture() {
            return result;
        }
        let snapshot = self
            .canvas
            .to_data_url()
            .map(Snapshot::from_encoded)
            .map_err(|error| SurfaceError::Capture(format!("{error:?}")))?;
        match self.read_pixels() {
            Ok(pixels) => {
                let bytes = pixels.width() as usize * pixels.height() as usize * 4;
                self.images
                    .borrow_mut()
                    .insert(snapshot.clone(), pixels, bytes);
            }
            Err(error) => warn!("Snapshot pixels not cached: {error:?}"),
        }
        Ok(snapshot)
    }

    /// Cached snapshots restore immediately. Anything else is decoded
    /// asynchronously, and paint calls made meanwhile are queued behind it.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        if snapshot.is_empty() {
            self.deferred.borrow_mut().cancel();
            Self::clear_all(&self.ctx, self.size.get());
            return Ok(());
        }
        if let Some(pixels) = self.images.borrow().get(snapshot) {
            self.deferred.borrow_mut().cancel();
            Self::clear_all(&self.ctx, self.size.get());
            return self
                .ctx
                .put_image_data(pixels, 0.0, 0.0)
                .map_err(|error| SurfaceError::Restore(format!("{error:?}")));
        }
        self.decode(snapshot)
    }
}
