use std::{net::TcpStream, thread, time::Duration};

use fuzz_stream::{config::Config, processor::StreamProcessor, service::service, streamer::*};
use serde_json::Value;
use tungstenite::{connect, stream::MaybeTlsStream, Message, WebSocket};
use url::Url;

#[path = "./utilities.rs"]
mod utilities;
use utilities::get_record_iter;

const ADDRESS: &str = "127.0.0.1:9031";
const COUNT: u64 = 1000;

fn connect_retry(url: &str) -> WebSocket<MaybeTlsStream<TcpStream>> {
    for _ in 0..50 {
        if let Ok((socket, _resp)) = connect(Url::parse(url).unwrap()) {
            return socket;
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("Can't connect to {}", url);
}

#[test]
fn test_service() {
    thread::spawn(|| {
        let mut processor = StreamProcessor::new(Config {
            max_fc: 20,
            ..Config::default()
        })
        .unwrap();
        let (records, write) = service(ADDRESS);
        let streamer = Streamer::new(records, write);
        Streamer::run(streamer, &mut processor).unwrap();
    });
    let mut snapshots_socket = connect_retry(&format!("ws://{}/ws/snapshots", ADDRESS));
    thread::spawn(|| {
        let mut points_socket = connect_retry(&format!("ws://{}/ws/points", ADDRESS));
        for r in get_record_iter(COUNT as usize) {
            points_socket
                .write_message(Message::Text(r.unwrap()))
                .unwrap();
        }
        points_socket.close(None).unwrap();
    });
    loop {
        let m = snapshots_socket.read_message().unwrap();
        let snapshot: Value = serde_json::from_str(&m.into_text().unwrap()).unwrap();
        let clusters = snapshot["clusters"].as_array().unwrap();
        assert!(!clusters.is_empty());
        assert!(clusters.len() <= 20);
        if snapshot["clock"].as_u64().unwrap() == COUNT {
            break;
        }
    }
    snapshots_socket.close(None).unwrap();
}
