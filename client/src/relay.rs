use drawboard_shared::{decode_frame, encode_frame, DrawingOperation, WireMessage};
use log::{debug, warn};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection is not open")]
    NotOpen,
    #[error("send failed: {0}")]
    Send(String),
}

pub trait Transport {
    fn is_open(&self) -> bool;
    fn send_text(&self, payload: &str) -> Result<(), TransportError>;
}

type OperationHandler = Box<dyn FnMut(&DrawingOperation)>;
type StateHandler = Box<dyn FnMut(ConnectionState)>;

/// Sends finished local operations and dispatches operations received from
/// peers. Delivery is best effort: nothing is queued or retried.
pub struct RelayClient<T: Transport> {
    transport: T,
    state: ConnectionState,
    receive_handlers: Vec<OperationHandler>,
    state_handlers: Vec<StateHandler>,
}

impl<T: Transport> RelayClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Connecting,
            receive_handlers: Vec::new(),
            state_handlers: Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn send(&self, op: &DrawingOperation) -> bool {
        if !self.transport.is_open() {
            debug!("Dropping {} operation, relay not connected", op.tool.name());
            return false;
        }
        let payload = match encode_frame(&WireMessage::Draw(op.clone())) {
            Ok(payload) => payload,
            Err(error) => {
                warn!("Failed to encode operation: {error}");
                return false;
            }
        };
        match self.transport.send_text(&payload) {
            Ok(()) => true,
            Err(error) => {
                debug!("Dropping {} operation: {error}", op.tool.name());
                false
            }
        }
    }

    pub fn on_receive(&mut self, handler: impl FnMut(&DrawingOperation) + 'static) {
        self.receive_handlers.push(Box::new(handler));
    }

    pub fn on_state_change(&mut self, handler: impl FnMut(ConnectionState) + 'static) {
        self.state_handlers.push(Box::new(handler));
    }

    pub fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        debug!("Relay connection {} -> {}", self.state.label(), state.label());
        self.state = state;
        for handler in self.state_handlers.iter_mut() {
            handler(state);
        }
    }

    pub fn handle_frame(&mut self, text: &str) -> bool {
        let op = match decode_frame(text) {
            Ok(WireMessage::Draw(op)) => op,
            Err(error) => {
                warn!("Ignoring relay frame: {error}");
                return false;
            }
        };
        for handler in self.receive_handlers.iter_mut() {
            handler(&op);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawboard_shared::{Point, Tool};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MockTransport {
        open: Rc<Cell<bool>>,
        fail: Rc<Cell<bool>>,
        sent: Rc<RefCell<Vec<String>>>,
    }

    impl Transport for MockTransport {
        fn is_open(&self) -> bool {
            self.open.get()
        }

        fn send_text(&self, payload: &str) -> Result<(), TransportError> {
            if self.fail.get() {
                return Err(TransportError::Send("socket closed".into()));
            }
            self.sent.borrow_mut().push(payload.to_string());
            Ok(())
        }
    }

    fn line(x: f64) -> DrawingOperation {
        DrawingOperation::shape(
            Tool::Line,
            "#000000",
            5.0,
            Point::new(x, 0.0),
            Point::new(10.0, 10.0),
        )
    }

    #[test]
    fn send_encodes_a_draw_frame() {
        let transport = MockTransport::default();
        transport.open.set(true);
        let relay = RelayClient::new(transport.clone());

        assert!(relay.send(&line(0.0)));
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(decode_frame(&sent[0]).unwrap(), WireMessage::Draw(line(0.0)));
    }

    #[test]
    fn send_drops_when_disconnected() {
        let transport = MockTransport::default();
        let relay = RelayClient::new(transport.clone());
        assert!(!relay.send(&line(0.0)));
        assert!(transport.sent.borrow().is_empty());

        transport.open.set(true);
        transport.fail.set(true);
        assert!(!relay.send(&line(0.0)));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn inbound_operations_reach_handlers_in_order() {
        let mut relay = RelayClient::new(MockTransport::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            relay.on_receive(move |op| seen.borrow_mut().push(op.start_point.x));
        }
        for x in [1.0, 2.0, 3.0] {
            let frame = encode_frame(&WireMessage::Draw(line(x))).unwrap();
            assert!(relay.handle_frame(&frame));
        }
        assert_eq!(*seen.borrow(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn receiving_does_not_retransmit() {
        let transport = MockTransport::default();
        transport.open.set(true);
        let mut relay = RelayClient::new(transport.clone());
        relay.on_receive(|_| {});
        let frame = encode_frame(&WireMessage::Draw(line(1.0))).unwrap();
        relay.handle_frame(&frame);
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn malformed_frames_are_ignored() {
        let mut relay = RelayClient::new(MockTransport::default());
        let calls = Rc::new(Cell::new(0));
        {
            let calls = calls.clone();
            relay.on_receive(move |_| calls.set(calls.get() + 1));
        }
        assert!(!relay.handle_frame("garbage"));
        assert!(!relay.handle_frame(r#"{"event":"draw","payload":{"tool":"spray"}}"#));
        assert!(!relay.handle_frame(
            r##"{"event":"draw","payload":{"tool":"text","strokeStyle":"#000","lineWidth":5,"startPoint":{"x":0,"y":0},"endPoint":{"x":0,"y":0}}}"##
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn state_changes_are_observable() {
        let mut relay = RelayClient::new(MockTransport::default());
        assert_eq!(relay.state(), ConnectionState::Connecting);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            relay.on_state_change(move |state| seen.borrow_mut().push(state));
        }
        relay.set_state(ConnectionState::Open);
        relay.set_state(ConnectionState::Open);
        relay.set_state(ConnectionState::Closed);
        assert_eq!(
            *seen.borrow(),
            vec![ConnectionState::Open, ConnectionState::Closed]
        );
        assert_eq!(relay.state(), ConnectionState::Closed);
    }
}
