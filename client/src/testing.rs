use std::cell::RefCell;
use std::collections::HashMap;

use drawboard_shared::Point;

use crate::renderer::{Renderer, Snapshot, Surface, SurfaceError};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: String,
        line_width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: String,
        width: f64,
    },
    Polygon {
        vertices: Vec<Point>,
        color: String,
        width: f64,
    },
    Text {
        text: String,
        at: Point,
        font_size: f64,
        color: String,
    },
    Clear {
        origin: Point,
        width: f64,
        height: f64,
    },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub content: Vec<Call>,
    pub log: Vec<Call>,
    captures: RefCell<HashMap<String, Vec<Call>>>,
    pub fail_capture: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, call: Call) {
        self.content.push(call.clone());
        self.log.push(call);
    }

    pub fn take_log(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.log)
    }
}

impl Renderer for RecordingSurface {
    fn stroke_line(&mut self, from: Point, to: Point, color: &str, width: f64) {
        self.record(Call::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    fn stroke_rect(&mut self, origin: Point, width: f64, height: f64, color: &str, line_width: f64) {
        self.record(Call::Rect {
            origin,
            width,
            height,
            color: color.to_string(),
            line_width,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) {
        self.record(Call::Circle {
            center,
            radius,
            color: color.to_string(),
            width,
        });
    }

    fn stroke_polygon(&mut self, vertices: &[Point], color: &str, width: f64) {
        self.record(Call::Polygon {
            vertices: vertices.to_vec(),
            color: color.to_string(),
            width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, font_size: f64, color: &str) {
        self.record(Call::Text {
            text: text.to_string(),
            at,
            font_size,
            color: color.to_string(),
        });
    }

    fn clear_rect(&mut self, origin: Point, width: f64, height: f64) {
        self.record(Call::Clear {
            origin,
            width,
            height,
        });
    }
}

impl Surface for RecordingSurface {
    fn capture(&self) -> Result<Snapshot, SurfaceError> {
        if self.fail_capture {
            return Err(SurfaceError::Capture("capture disabled".into()));
        }
        if self.content.is_empty() {
            return Ok(Snapshot::default());
        }
        let mut captures = self.captures.borrow_mut();
        let key = format!("image-{}", captures.len());
        captures.insert(key.clone(), self.content.clone());
        Ok(Snapshot::from_encoded(key))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        if snapshot.is_empty() {
            self.content.clear();
            return Ok(());
        }
        let content = self
            .captures
            .borrow()
            .get(snapshot.as_encoded())
            .cloned()
            .ok_or_else(|| SurfaceError::Restore(format!("unknown image {}", snapshot.as_encoded())))?;
        self.content = content;
        Ok(())
    }
}
