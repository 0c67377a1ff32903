use drawboard_shared::{
    sanitize_color, sanitize_font_size, sanitize_text, Point, Tool, DEFAULT_COLOR,
    DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH,
};

pub const BRUSH_PRESETS: [f64; 3] = [5.0, 10.0, 15.0];

pub enum DragState {
    Idle,
    Dragging { start: Point, path: Vec<Point> },
}

pub struct EditorState {
    pub tool: Tool,
    pub stroke_style: String,
    pub line_width: f64,
    pub font_size: f64,
    pub pending_text: String,
    pub drag: DragState,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            stroke_style: DEFAULT_COLOR.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            pending_text: String::new(),
            drag: DragState::Idle,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.drag = DragState::Idle;
        }
        self.tool = tool;
    }

    pub fn set_stroke_style(&mut self, color: impl Into<String>) {
        self.stroke_style = sanitize_color(color.into());
    }

    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width.clamp(1.0, MAX_LINE_WIDTH);
        }
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.font_size = sanitize_font_size(Some(size));
        }
    }

    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending_text = sanitize_text(text.into());
    }
}
