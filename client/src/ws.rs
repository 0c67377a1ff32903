use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket, Window};

use crate::net::websocket_url;
use crate::relay::{ConnectionState, RelayClient, Transport, TransportError};

pub struct WsTransport {
    socket: WebSocket,
}

impl Transport for WsTransport {
    fn is_open(&self) -> bool {
        self.socket.ready_state() == WebSocket::OPEN
    }

    fn send_text(&self, payload: &str) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.socket
            .send_with_str(payload)
            .map_err(|error| TransportError::Send(format!("{error:?}")))
    }
}

pub type SharedRelay = Rc<RefCell<RelayClient<WsTransport>>>;

pub fn connect_relay(window: &Window) -> Result<SharedRelay, JsValue> {
    let url = websocket_url(window)?;
    info!("Connecting to relay at {url}");
    let socket = WebSocket::new(&url)?;

    let relay = Rc::new(RefCell::new(RelayClient::new(WsTransport {
        socket: socket.clone(),
    })));

    {
        let relay = relay.clone();
        let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
            info!("Relay connected");
            relay.borrow_mut().set_state(ConnectionState::Open);
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let relay = relay.clone();
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            info!("Relay disconnected (code {})", event.code());
            relay.borrow_mut().set_state(ConnectionState::Closed);
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }

    {
        let relay = relay.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
            warn!("Relay socket error");
            relay.borrow_mut().set_state(ConnectionState::Closed);
        });
        socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    {
        let relay = relay.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => {
                    relay.borrow_mut().handle_frame(&text);
                }
                None => warn!("Ignoring non-text relay frame"),
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    {
        let socket = socket.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            let _ = socket.close();
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    Ok(relay)
}
