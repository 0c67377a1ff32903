use drawboard_shared::{DrawingOperation, Point, Tool, MAX_PATH_POINTS};
use log::debug;

use crate::geometry::normalize_point;
use crate::history::HistoryStack;
use crate::persistence::SnapshotStore;
use crate::render::{render_freehand_step, render_operation};
use crate::renderer::{Renderer, Surface};
use crate::state::{DragState, EditorState};

pub fn pointer_down<T, S>(
    state: &mut EditorState,
    surface: &mut T,
    history: &mut HistoryStack<S>,
    at: Point,
) -> Option<DrawingOperation>
where
    T: Surface + ?Sized,
    S: SnapshotStore,
{
    if state.is_dragging() {
        return None;
    }
    let at = normalize_point(at)?;

    if state.tool == Tool::Text {
        if state.pending_text.is_empty() {
            return None;
        }
        history.snapshot(&*surface);
        let text = std::mem::take(&mut state.pending_text);
        let op = DrawingOperation::text(
            state.stroke_style.clone(),
            state.line_width,
            at,
            text,
            state.font_size,
        );
        render_operation(surface, &op);
        history.persist_current(&*surface);
        return Some(op);
    }

    history.snapshot(&*surface);
    if state.tool == Tool::Eraser {
        render_freehand_step(
            surface,
            state.tool,
            at,
            at,
            &state.stroke_style,
            state.line_width,
        );
    }
    state.drag = DragState::Dragging {
        start: at,
        path: vec![at],
    };
    None
}

pub fn pointer_move<T: Renderer + ?Sized>(state: &mut EditorState, surface: &mut T, at: Point) {
    let Some(at) = normalize_point(at) else {
        return;
    };
    if !state.tool.is_freehand() {
        return;
    }
    let DragState::Dragging { path, .. } = &mut state.drag else {
        return;
    };
    if path.len() >= MAX_PATH_POINTS {
        return;
    }
    let Some(last) = path.last().copied() else {
        return;
    };
    if last == at {
        return;
    }
    render_freehand_step(
        surface,
        state.tool,
        last,
        at,
        &state.stroke_style,
        state.line_width,
    );
    path.push(at);
}

pub fn pointer_up<T, S>(
    state: &mut EditorState,
    surface: &mut T,
    history: &mut HistoryStack<S>,
    at: Point,
) -> Option<DrawingOperation>
where
    T: Surface + ?Sized,
    S: SnapshotStore,
{
    let DragState::Dragging { start, path } = std::mem::replace(&mut state.drag, DragState::Idle)
    else {
        return None;
    };
    let end = normalize_point(at)
        .or_else(|| path.last().copied())
        .unwrap_or(start);

    let op = if state.tool.is_freehand() {
        let mut path = path;
        if path.len() < MAX_PATH_POINTS && path.last() != Some(&end) {
            if let Some(last) = path.last().copied() {
                render_freehand_step(
                    surface,
                    state.tool,
                    last,
                    end,
                    &state.stroke_style,
                    state.line_width,
                );
            }
            path.push(end);
        }
        DrawingOperation::freehand(
            state.tool,
            state.stroke_style.clone(),
            state.line_width,
            path,
        )
    } else {
        let op = DrawingOperation::shape(
            state.tool,
            state.stroke_style.clone(),
            state.line_width,
            start,
            end,
        );
        render_operation(surface, &op);
        op
    };

    history.persist_current(&*surface);
    Some(op)
}

/// Replays an operation received from a peer. Remote operations are not
/// recorded in the local undo history.
pub fn apply_remote<T, S>(surface: &mut T, history: &mut HistoryStack<S>, op: &DrawingOperation)
where
    T: Surface + ?Sized,
    S: SnapshotStore,
{
    debug!("Replaying remote {} operation", op.tool.name());
    render_operation(surface, op);
    history.persist_current(&*surface);
}
