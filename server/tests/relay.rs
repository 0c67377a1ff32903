use std::time::Duration;

use drawboard_server::rooms::peer_count;
use drawboard_server::{serve, AppState, DEFAULT_ROOM};
use drawboard_shared::{decode_frame, Point, Tool, WireMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const LINE_FRAME: &str = r##"{"event":"draw","payload":{"tool":"line","strokeStyle":"#000000","lineWidth":5,"startPoint":{"x":0,"y":0},"endPoint":{"x":10,"y":10}}}"##;

async fn start_server() -> (String, AppState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::default();
    tokio::spawn(serve(listener, state.clone()));
    (format!("ws://{addr}/ws"), state)
}

async fn connect(url: &str) -> Client {
    let (client, _) = connect_async(url).await.unwrap();
    client
}

async fn wait_for_peers(state: &AppState, expected: usize) {
    for _ in 0..300 {
        if peer_count(state, DEFAULT_ROOM).await == expected {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("room never reached {expected} peers");
}

async fn next_text(client: &mut Client, wait: Duration) -> Option<String> {
    loop {
        match timeout(wait, client.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return Some(text),
            Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => continue,
            _ => return None,
        }
    }
}

fn assert_line(text: &str) {
    let WireMessage::Draw(op) = decode_frame(text).unwrap();
    assert_eq!(op.tool, Tool::Line);
    assert_eq!(op.start_point, Point::new(0.0, 0.0));
    assert_eq!(op.end_point, Point::new(10.0, 10.0));
    assert_eq!(op.line_width, 5.0);
    assert_eq!(op.stroke_style, "#000000");
}

#[tokio::test]
async fn draw_reaches_other_clients_only() {
    let (url, state) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    let mut c = connect(&url).await;
    wait_for_peers(&state, 3).await;

    a.send(Message::Text(LINE_FRAME.to_string())).await.unwrap();

    let at_b = next_text(&mut b, Duration::from_secs(2)).await.unwrap();
    let at_c = next_text(&mut c, Duration::from_secs(2)).await.unwrap();
    assert_eq!(at_b, LINE_FRAME);
    assert_eq!(at_c, LINE_FRAME);
    assert_line(&at_b);
    assert_line(&at_c);
    assert!(next_text(&mut a, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn disconnected_client_is_skipped() {
    let (url, state) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    let mut c = connect(&url).await;
    wait_for_peers(&state, 3).await;

    b.close(None).await.unwrap();
    wait_for_peers(&state, 2).await;

    a.send(Message::Text(LINE_FRAME.to_string())).await.unwrap();
    let at_c = next_text(&mut c, Duration::from_secs(2)).await.unwrap();
    assert_line(&at_c);
    assert!(next_text(&mut a, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn invalid_frames_are_not_relayed() {
    let (url, state) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    wait_for_peers(&state, 2).await;

    a.send(Message::Text("not json".to_string())).await.unwrap();
    a.send(Message::Text(
        r#"{"event":"draw","payload":{"tool":"spray"}}"#.to_string(),
    ))
    .await
    .unwrap();
    a.send(Message::Text(LINE_FRAME.to_string())).await.unwrap();

    let first = next_text(&mut b, Duration::from_secs(2)).await.unwrap();
    assert_eq!(first, LINE_FRAME);
}

#[tokio::test]
async fn frames_from_one_sender_arrive_in_order() {
    let (url, state) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    wait_for_peers(&state, 2).await;

    let frames: Vec<String> = (0..5)
        .map(|index| {
            format!(
                r##"{{"event":"draw","payload":{{"tool":"line","strokeStyle":"#000000","lineWidth":5,"startPoint":{{"x":{index},"y":0}},"endPoint":{{"x":10,"y":10}}}}}}"##
            )
        })
        .collect();
    for frame in &frames {
        a.send(Message::Text(frame.clone())).await.unwrap();
    }
    for frame in &frames {
        let received = next_text(&mut b, Duration::from_secs(2)).await.unwrap();
        assert_eq!(&received, frame);
    }
}

#[tokio::test]
async fn room_empties_when_everyone_leaves() {
    let (url, state) = start_server().await;
    let mut a = connect(&url).await;
    wait_for_peers(&state, 1).await;
    a.close(None).await.unwrap();
    wait_for_peers(&state, 0).await;
    assert!(state.rooms.read().await.is_empty());
}
