use desktopd_bridge::{Connector, EventSink, Socket, SocketEvent, TransportError};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::chrome::stringify_js_error;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Socket = BrowserSocket;

    fn open(&self, url: &str, events: EventSink) -> Result<BrowserSocket, TransportError> {
        let ws = WebSocket::new(url).map_err(|e| TransportError::Connect(stringify_js_error(e)))?;
        debug!(target = "desktopd", url, generation = events.generation(), "websocket created");

        let open_sink = events.clone();
        let onopen = Closure::<dyn FnMut()>::new(move || open_sink.emit(SocketEvent::Open));
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let message_sink = events.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            // Binary frames are not part of the protocol.
            if let Some(text) = event.data().as_string() {
                message_sink.emit(SocketEvent::Message(text));
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let close_sink = events.clone();
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            close_sink.emit(SocketEvent::Close {
                code: Some(event.code()),
                reason: event.reason(),
            });
        });
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        let error_sink = events;
        let onerror = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            error_sink.emit(SocketEvent::Error(event.type_()));
        });
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        Ok(BrowserSocket {
            ws,
            _handlers: Handlers {
                _onopen: onopen,
                _onmessage: onmessage,
                _onclose: onclose,
                _onerror: onerror,
            },
        })
    }
}

/// Keeps the callbacks alive for as long as the socket is owned.
struct Handlers {
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
}

pub struct BrowserSocket {
    ws: WebSocket,
    _handlers: Handlers,
}

impl Socket for BrowserSocket {
    fn is_open(&self) -> bool {
        self.ws.ready_state() == WebSocket::OPEN
    }

    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.ws
            .send_with_str(text)
            .map_err(|e| TransportError::Send(stringify_js_error(e)))
    }

    fn close(&self) {
        let state = self.ws.ready_state();
        if state == WebSocket::CONNECTING || state == WebSocket::OPEN {
            let _ = self.ws.close();
        }
    }
}

impl Drop for BrowserSocket {
    fn drop(&mut self) {
        // The handlers are freed with us; JS must not call into them afterwards.
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
    }
}
