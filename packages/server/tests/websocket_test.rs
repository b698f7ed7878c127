//! Integration tests driving an in-process hub over real sockets.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::oneshot, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message},
};

use chitchat_server::{
    config::HubConfig,
    infrastructure::dto::{
        http::{AcknowledgementDto, HubStateDto, ParticipantDto},
        websocket::ServerMessage,
    },
    ui::Server,
    usecase::ChatHub,
};

const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// In-process server bound to an ephemeral port
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<bool>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = Server::new(Arc::new(ChatHub::new()), HubConfig::default());
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    shutdown_rx.await.ok();
                })
                .await
                .is_ok()
        });

        TestServer {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    fn join_url(&self, id: u32, name: &str, lamport: u64) -> String {
        format!(
            "ws://{}/ws?id={}&name={}&lamport={}",
            self.addr, id, name, lamport
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!("http://{}/api{}", self.addr, path)
    }

    async fn join(&self, id: u32, name: &str, lamport: u64) -> WsStream {
        let (ws, _response) = timeout(TIMEOUT, connect_async(self.join_url(id, name, lamport)))
            .await
            .expect("timed out connecting")
            .expect("failed to join");
        ws
    }

    async fn hub_state(&self) -> HubStateDto {
        reqwest::get(self.api_url("/participants"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn stop(mut self) -> bool {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }
        timeout(TIMEOUT, self.handle)
            .await
            .expect("server did not shut down")
            .unwrap()
    }
}

/// Next chat frame pushed by the hub
async fn next_message(ws: &mut WsStream) -> ServerMessage {
    loop {
        let frame = timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Waits until the hub closes the stream
async fn expect_closed(ws: &mut WsStream) {
    loop {
        match timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for close")
        {
            None | Some(Ok(Message::Close(_))) | Some(Err(_)) => return,
            Some(Ok(Message::Text(text))) => panic!("unexpected message: {}", text),
            Some(Ok(_)) => {}
        }
    }
}

async fn send_frame(ws: &mut WsStream, frame: serde_json::Value) {
    ws.send(Message::text(frame.to_string())).await.unwrap();
}

#[tokio::test]
async fn test_websocket_chat_flow() {
    // テスト項目: WebSocket で参加・送信・退出し、全員が同じ Lamport 時刻で受信する
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作): alice と bob が参加
    let mut alice = server.join(1, "alice", 0).await;
    let joined = next_message(&mut alice).await;
    let mut bob = server.join(2, "bob", 0).await;

    // then (期待する結果):
    assert_eq!(joined.name, "Server");
    assert_eq!(
        joined.text,
        "Participant alice joined Chitty-Chat at Lamport time 1"
    );
    assert_eq!(joined.lamport, 1);
    for ws in [&mut alice, &mut bob] {
        let notice = next_message(ws).await;
        assert_eq!(
            notice.text,
            "Participant bob joined Chitty-Chat at Lamport time 2"
        );
        assert_eq!(notice.lamport, 2);
    }

    // when (操作): alice が送信
    send_frame(
        &mut alice,
        serde_json::json!({"type": "chat", "text": "hi", "lamport": 1}),
    )
    .await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        let message = next_message(ws).await;
        assert_eq!(message.name, "alice");
        assert_eq!(message.text, "hi");
        assert_eq!(message.lamport, 3);
    }

    // when (操作): bob が leave フレームを送信
    send_frame(&mut bob, serde_json::json!({"type": "leave", "lamport": 3})).await;

    // then (期待する結果):
    let notice = next_message(&mut alice).await;
    assert_eq!(
        notice.text,
        "Participant bob left Chitty-Chat at Lamport time 4"
    );
    assert_eq!(notice.lamport, 4);
    expect_closed(&mut bob).await;

    let state = server.hub_state().await;
    assert_eq!(state.lamport, 4);
    assert_eq!(
        state.participants,
        vec![ParticipantDto {
            id: 1,
            name: "alice".to_string()
        }]
    );

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_duplicate_participant_is_rejected() {
    // テスト項目: 既に参加中の id で接続すると 409 Conflict で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join(1, "alice", 0).await;
    next_message(&mut alice).await;

    // when (操作):
    let result = connect_async(server.join_url(1, "mallory", 0)).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 409),
        other => panic!("expected 409, got {:?}", other.map(|(_, r)| r.status())),
    }
    // the rejected join did not advance the clock
    assert_eq!(server.hub_state().await.lamport, 1);

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_invalid_display_name_is_rejected() {
    // テスト項目: 空の表示名での接続は 400 Bad Request で拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(server.join_url(1, "%20", 0)).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 400),
        other => panic!("expected 400, got {:?}", other.map(|(_, r)| r.status())),
    }

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_join_with_overflowing_lamport_is_rejected() {
    // テスト項目: u64::MAX の Lamport 時刻での接続は 400 Bad Request で拒否され、クロックは進まない
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(server.join_url(1, "mallory", u64::MAX)).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 400),
        other => panic!("expected 400, got {:?}", other.map(|(_, r)| r.status())),
    }
    let state = server.hub_state().await;
    assert_eq!(state.lamport, 0);
    assert!(state.participants.is_empty());

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_http_send_message_and_leave() {
    // テスト項目: HTTP の SendMessage / Leave が Join ストリームに反映される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let mut alice = server.join(1, "alice", 0).await;
    next_message(&mut alice).await;

    // when (操作):
    let ack: AcknowledgementDto = client
        .post(server.api_url("/messages"))
        .json(&serde_json::json!({"id": 1, "text": "over http", "lamport": 10}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        ack,
        AcknowledgementDto {
            confirmation: true,
            lamport: Some(11),
            recipients: 1,
        }
    );
    let message = next_message(&mut alice).await;
    assert_eq!(message.text, "over http");
    assert_eq!(message.lamport, 11);

    // when (操作): HTTP で leave し、もう一度 leave
    let first: AcknowledgementDto = client
        .post(server.api_url("/leave"))
        .json(&serde_json::json!({"id": 1, "lamport": 11}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: AcknowledgementDto = client
        .post(server.api_url("/leave"))
        .json(&serde_json::json!({"id": 1, "lamport": 20}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(first.lamport, Some(12));
    assert_eq!(second.lamport, None);
    assert!(second.confirmation);
    expect_closed(&mut alice).await;
    assert_eq!(server.hub_state().await.lamport, 12);

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_http_send_rejections() {
    // テスト項目: 未参加者の送信は 404、長すぎるメッセージとオーバーフローする Lamport 時刻は 400 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let mut alice = server.join(1, "alice", 0).await;
    next_message(&mut alice).await;

    // when (操作):
    let unknown = client
        .post(server.api_url("/messages"))
        .json(&serde_json::json!({"id": 2, "text": "hello", "lamport": 0}))
        .send()
        .await
        .unwrap();
    let too_long = client
        .post(server.api_url("/messages"))
        .json(&serde_json::json!({"id": 1, "text": "x".repeat(129), "lamport": 0}))
        .send()
        .await
        .unwrap();

    let overflow = client
        .post(server.api_url("/messages"))
        .json(&serde_json::json!({"id": 1, "text": "hi", "lamport": u64::MAX}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(overflow.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(too_long.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(server.hub_state().await.lamport, 1);

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_closing_socket_leaves() {
    // テスト項目: WebSocket を閉じると Leave として扱われ、残りの参加者に通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join(1, "alice", 0).await;
    next_message(&mut alice).await;
    let mut bob = server.join(2, "bob", 0).await;
    next_message(&mut alice).await;
    next_message(&mut bob).await;

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    let notice = next_message(&mut alice).await;
    assert_eq!(
        notice.text,
        "Participant bob left Chitty-Chat at Lamport time 3"
    );
    assert_eq!(server.hub_state().await.participants.len(), 1);

    assert!(server.stop().await);
}

#[tokio::test]
async fn test_shutdown_ends_join_streams() {
    // テスト項目: サーバーのシャットダウンで全ての Join ストリームが終了する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join(1, "alice", 0).await;
    next_message(&mut alice).await;

    // when (操作):
    let stopped = server.stop().await;

    // then (期待する結果):
    assert!(stopped);
    expect_closed(&mut alice).await;
}
