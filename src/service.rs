//! Websocket front end: clients push records on `/ws/points`
//! and receive a snapshot per processed record on `/ws/snapshots`.

use std::{
    error::Error,
    io,
    net::{TcpListener, TcpStream},
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex, MutexGuard,
    },
    thread::spawn,
};

use tracing::{error, info, warn};
use tungstenite::{
    accept_hdr,
    handshake::server::{ErrorResponse, Request, Response},
    Message, WebSocket,
};

use crate::{record::Record, streamer};

type Peers = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Starts a websocket server on the given address and returns the records it receives
/// and a writer that broadcasts snapshots to subscribers.
pub fn service(
    address: &str,
) -> (
    impl Iterator<Item = Result<String, Box<dyn Error>>>,
    impl FnMut(String) -> Result<(), Box<dyn Error>>,
) {
    let (record_producer, record_receiver) = mpsc::channel::<String>();
    let (snapshot_producer, snapshot_receiver) = mpsc::channel::<String>();
    let address = address.to_string();
    spawn(move || start_server(&address, record_producer, snapshot_receiver));
    streamer::channels(record_receiver, snapshot_producer)
}

fn start_server(address: &str, record_producer: Sender<String>, snapshot_receiver: Receiver<String>) {
    let peers: Peers = Arc::new(Mutex::new(vec![]));
    start_dispatcher(peers.clone(), snapshot_receiver);
    start_websockets(address, peers, record_producer);
}

fn start_websockets(address: &str, peers: Peers, record_producer: Sender<String>) {
    let server = match TcpListener::bind(address) {
        Ok(server) => server,
        Err(reason) => {
            error!(%reason, address, "cannot bind websocket server");
            return;
        }
    };
    info!(address, "websocket server listening");
    for stream in server.incoming() {
        let peers = peers.clone();
        let record_producer = record_producer.clone();
        spawn(move || match get_websocket(stream) {
            Ok((path, websocket)) => {
                if path.ends_with("/ws/points") {
                    handle_record_receiver(websocket, record_producer)
                } else if path.ends_with("/ws/snapshots") {
                    handle_snapshot_consumer(websocket, peers)
                } else {
                    warn!(%path, "unknown websocket path");
                }
            }
            Err(reason) => warn!(%reason, "websocket handshake failed"),
        });
    }
}

fn get_websocket(
    stream: Result<TcpStream, io::Error>,
) -> Result<(String, WebSocket<TcpStream>), Box<dyn Error>> {
    let mut path: String = String::new();
    let callback = |req: &Request, response: Response| -> Result<Response, ErrorResponse> {
        path = String::from(req.uri().path());
        Ok(response)
    };
    let websocket = accept_hdr(stream?, callback).map_err(|e| e.to_string())?;
    Ok((path, websocket))
}

fn handle_snapshot_consumer(websocket: WebSocket<TcpStream>, peers: Peers) {
    lock(&peers).push(websocket);
}

fn handle_record_receiver(mut websocket: WebSocket<TcpStream>, record_producer: Sender<String>) {
    loop {
        match websocket.read_message() {
            Ok(message) => {
                if !read_record(message, &record_producer) {
                    break;
                }
            }
            Err(reason) => {
                warn!(%reason, "record socket failed");
                break;
            }
        }
    }
}

/// Forwards well-formed records. Returns `false` when the socket is closing.
fn read_record(message: Message, record_producer: &Sender<String>) -> bool {
    match message {
        Message::Text(txt) => {
            if let Err(reason) = serde_json::from_str::<Record>(&txt) {
                warn!(%reason, "malformed record dropped");
            } else if let Err(reason) = record_producer.send(txt) {
                warn!(%reason, "record channel closed");
                return false;
            }
            true
        }
        Message::Binary(_) => {
            warn!("unsupported binary message");
            true
        }
        Message::Close(_) => false,
        _ => true,
    }
}

fn start_dispatcher(peers: Peers, snapshot_receiver: Receiver<String>) {
    spawn(move || {
        for msg in snapshot_receiver {
            lock(&peers).retain_mut(|peer| send_snapshot(peer, msg.clone()));
        }
    });
}

/// Returns `false` when the peer should be dropped.
fn send_snapshot(peer: &mut WebSocket<TcpStream>, msg: String) -> bool {
    if !peer.can_write() {
        return false;
    }
    match peer.write_message(Message::Text(msg)) {
        Ok(()) => true,
        Err(reason) => {
            warn!(%reason, "snapshot subscriber dropped");
            false
        }
    }
}

fn lock(peers: &Peers) -> MutexGuard<'_, Vec<WebSocket<TcpStream>>> {
    peers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
