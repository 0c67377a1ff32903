use drawboard_shared::Point;
use thiserror::Error;

pub trait Renderer {
    fn stroke_line(&mut self, from: Point, to: Point, color: &str, width: f64);
    fn stroke_rect(&mut self, origin: Point, width: f64, height: f64, color: &str, line_width: f64);
    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64);
    fn stroke_polygon(&mut self, vertices: &[Point], color: &str, width: f64);
    fn fill_text(&mut self, text: &str, at: Point, font_size: f64, color: &str);
    fn clear_rect(&mut self, origin: Point, width: f64, height: f64);
}

pub trait Surface: Renderer {
    fn capture(&self) -> Result<Snapshot, SurfaceError>;
    /// Replaces the raster with `snapshot`. An empty snapshot clears it.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_encoded(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to capture surface: {0}")]
    Capture(String),
    #[error("failed to restore surface: {0}")]
    Restore(String),
}
