//! Socket.IO channel sharing the HTTP listener.
//!
//! Only the connection lifecycle is observed; no application events are
//! registered on the default namespace.

use std::sync::Arc;

use socketioxide::SocketIo;
use socketioxide::extract::SocketRef;
use socketioxide::layer::SocketIoLayer;
use tracing::info;

/// Request path prefix served by the Socket.IO layer.
pub const SOCKET_PATH: &str = "/socket.io";

/// Told about every socket that connects and disconnects.
pub trait ConnectionObserver: Send + Sync + 'static {
    fn connected(&self, id: &str);
    fn disconnected(&self, id: &str);
}

/// Logs connection lifecycle events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ConnectionObserver for TracingObserver {
    fn connected(&self, id: &str) {
        info!("User Connected: {}", id);
    }

    fn disconnected(&self, id: &str) {
        info!("User Disconnected: {}", id);
    }
}

pub fn create_socket_layer(observer: Arc<dyn ConnectionObserver>) -> (SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::builder().build_layer();

    io.ns("/", move |socket: SocketRef| {
        let observer = Arc::clone(&observer);
        async move {
            on_connect(socket, observer);
        }
    });

    (layer, io)
}

fn on_connect(socket: SocketRef, observer: Arc<dyn ConnectionObserver>) {
    observer.connected(&socket.id.to_string());

    socket.on_disconnect(move |socket: SocketRef| {
        let observer = Arc::clone(&observer);
        async move {
            observer.disconnected(&socket.id.to_string());
        }
    });
}
