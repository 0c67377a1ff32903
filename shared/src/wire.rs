use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DrawingOperation;

pub const DRAW_EVENT: &str = "draw";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", content = "payload")]
pub enum WireMessage {
    #[serde(rename = "draw")]
    Draw(DrawingOperation),
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unexpected event {0:?}")]
    UnexpectedEvent(String),
    #[error("operation has a non-finite coordinate")]
    NonFiniteCoordinate,
    #[error("text operation without text")]
    MissingText,
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

pub fn encode_frame(message: &WireMessage) -> Result<String, OperationError> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode_frame(text: &str) -> Result<WireMessage, OperationError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    match envelope.event.as_str() {
        DRAW_EVENT => {
            let operation: DrawingOperation = serde_json::from_value(envelope.payload)?;
            Ok(WireMessage::Draw(operation.sanitize()?))
        }
        other => Err(OperationError::UnexpectedEvent(other.to_string())),
    }
}
