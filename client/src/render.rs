use drawboard_shared::{DrawingOperation, Point, Tool};

use crate::geometry::{circle_radius, eraser_rect, polygon_vertices, rect_between, POLYGON_SIDES};
use crate::renderer::Renderer;

pub fn render_freehand_step<R: Renderer + ?Sized>(
    renderer: &mut R,
    tool: Tool,
    from: Point,
    to: Point,
    color: &str,
    width: f64,
) {
    match tool {
        Tool::Brush => renderer.stroke_line(from, to, color, width),
        Tool::Eraser => {
            let rect = eraser_rect(to, width);
            renderer.clear_rect(rect.origin, rect.width, rect.height);
        }
        _ => {}
    }
}

pub fn render_operation<R: Renderer + ?Sized>(renderer: &mut R, op: &DrawingOperation) {
    let color = op.stroke_style.as_str();
    let width = op.line_width;
    match op.tool {
        Tool::Brush => {
            for segment in op.path.windows(2) {
                render_freehand_step(renderer, op.tool, segment[0], segment[1], color, width);
            }
        }
        Tool::Eraser => {
            for point in &op.path {
                render_freehand_step(renderer, op.tool, *point, *point, color, width);
            }
        }
        Tool::Line => renderer.stroke_line(op.start_point, op.end_point, color, width),
        Tool::Rectangle => {
            let rect = rect_between(op.start_point, op.end_point);
            renderer.stroke_rect(rect.origin, rect.width, rect.height, color, width);
        }
        Tool::Circle => {
            let radius = circle_radius(op.start_point, op.end_point);
            renderer.stroke_circle(op.start_point, radius, color, width);
        }
        Tool::Polygon => {
            let vertices = polygon_vertices(op.start_point, op.end_point, POLYGON_SIDES);
            renderer.stroke_polygon(&vertices, color, width);
        }
        Tool::Text => {
            if let Some(text) = op.text.as_deref() {
                renderer.fill_text(text, op.start_point, op.font_size_or_default(), color);
            }
        }
    }
}
