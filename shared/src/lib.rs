use serde::{Deserialize, Serialize};

mod wire;

pub use wire::{decode_frame, encode_frame, OperationError, WireMessage, DRAW_EVENT};

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;
pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const MAX_COLOR_LEN: usize = 32;
pub const MAX_LINE_WIDTH: f64 = 100.0;
pub const MAX_FONT_SIZE: f64 = 400.0;
pub const MAX_TEXT_LEN: usize = 1000;
pub const MAX_PATH_POINTS: usize = 10_000;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Polygon,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Brush,
        Tool::Eraser,
        Tool::Line,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Polygon,
        Tool::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Polygon => "polygon",
            Tool::Text => "text",
        }
    }

    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }
}

/// One replayable paint action. Built once at pointer release (or text commit)
/// and never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawingOperation {
    pub tool: Tool,
    pub stroke_style: String,
    pub line_width: f64,
    pub start_point: Point,
    pub end_point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Point>,
}

impl DrawingOperation {
    pub fn shape(
        tool: Tool,
        stroke_style: impl Into<String>,
        line_width: f64,
        start_point: Point,
        end_point: Point,
    ) -> Self {
        Self {
            tool,
            stroke_style: stroke_style.into(),
            line_width,
            start_point,
            end_point,
            text: None,
            font_size: None,
            path: Vec::new(),
        }
    }

    pub fn freehand(
        tool: Tool,
        stroke_style: impl Into<String>,
        line_width: f64,
        path: Vec<Point>,
    ) -> Self {
        let start_point = path.first().copied().unwrap_or(Point::new(0.0, 0.0));
        let end_point = path.last().copied().unwrap_or(start_point);
        Self {
            tool,
            stroke_style: stroke_style.into(),
            line_width,
            start_point,
            end_point,
            text: None,
            font_size: None,
            path,
        }
    }

    pub fn text(
        stroke_style: impl Into<String>,
        line_width: f64,
        at: Point,
        text: impl Into<String>,
        font_size: f64,
    ) -> Self {
        Self {
            tool: Tool::Text,
            stroke_style: stroke_style.into(),
            line_width,
            start_point: at,
            end_point: at,
            text: Some(text.into()),
            font_size: Some(font_size),
            path: Vec::new(),
        }
    }

    pub fn font_size_or_default(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn sanitize(mut self) -> Result<Self, OperationError> {
        if !self.start_point.is_finite() || !self.end_point.is_finite() {
            return Err(OperationError::NonFiniteCoordinate);
        }
        if self.path.iter().any(|point| !point.is_finite()) {
            return Err(OperationError::NonFiniteCoordinate);
        }
        self.stroke_style = sanitize_color(self.stroke_style);
        self.line_width = sanitize_line_width(self.line_width);
        self.path.truncate(MAX_PATH_POINTS);
        if self.tool.is_freehand() {
            if self.path.is_empty() {
                self.path.push(self.start_point);
            }
        } else {
            self.path.clear();
        }

        if self.tool == Tool::Text {
            let text = match self.text.take() {
                Some(text) if !text.is_empty() => text,
                _ => return Err(OperationError::MissingText),
            };
            self.text = Some(sanitize_text(text));
            self.font_size = Some(sanitize_font_size(self.font_size));
        } else {
            self.text = None;
            self.font_size = None;
        }
        Ok(self)
    }
}

pub fn sanitize_color(mut color: String) -> String {
    if color.trim().is_empty() {
        return DEFAULT_COLOR.to_string();
    }
    if color.len() > MAX_COLOR_LEN {
        let mut end = MAX_COLOR_LEN;
        while !color.is_char_boundary(end) {
            end -= 1;
        }
        color.truncate(end);
    }
    color
}

pub fn sanitize_line_width(width: f64) -> f64 {
    let width = if width.is_finite() && width > 0.0 {
        width
    } else {
        DEFAULT_LINE_WIDTH
    };
    width.clamp(1.0, MAX_LINE_WIDTH)
}

pub fn sanitize_font_size(size: Option<f64>) -> f64 {
    let size = match size {
        Some(size) if size.is_finite() && size > 0.0 => size,
        _ => DEFAULT_FONT_SIZE,
    };
    size.clamp(1.0, MAX_FONT_SIZE)
}

pub fn sanitize_text(text: String) -> String {
    match text.char_indices().nth(MAX_TEXT_LEN) {
        Some((end, _)) => text[..end].to_string(),
        None => text,
    }
}
