//! Log relay tests over real loopback sockets.

use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::time::Duration;

use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};
use spt_core::{LogEvent, MessagePart, PartKind};
use spt_osc::{LogRelay, RelayError};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

fn encode(addr: &str, args: Vec<OscType>) -> Vec<u8> {
    rosc::encoder::encode(&OscPacket::Message(OscMessage {
        addr: addr.to_string(),
        args,
    }))
    .unwrap()
}

async fn spawn_relay() -> (SocketAddr, mpsc::UnboundedReceiver<LogEvent>) {
    let relay = LogRelay::bind(loopback()).await.unwrap();
    let addr = relay.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut sink = move |event: LogEvent| {
            let _ = tx.send(event);
        };
        let _ = relay.run(&mut sink).await;
    });
    (addr, rx)
}

async fn next(rx: &mut mpsc::UnboundedReceiver<LogEvent>) -> LogEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("relay stopped")
}

#[tokio::test]
async fn events_are_delivered_in_arrival_order() {
    let (addr, mut rx) = spawn_relay().await;
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    sender
        .send_to(
            &encode("/log/info", vec![OscType::Int(0), OscType::String("first".into())]),
            addr,
        )
        .await
        .unwrap();
    sender
        .send_to(
            &encode(
                "/log/multi_message",
                vec![
                    OscType::Int(1),
                    OscType::String("thread".into()),
                    OscType::String("0.5".into()),
                    OscType::Int(1),
                    OscType::Int(1),
                    OscType::String("sample :bd_haus".into()),
                ],
            ),
            addr,
        )
        .await
        .unwrap();

    assert_eq!(
        next(&mut rx).await,
        LogEvent::Info {
            style: 0,
            text: "first".into()
        }
    );
    assert_eq!(
        next(&mut rx).await,
        LogEvent::MultiMessage {
            run_id: 1,
            thread: "thread".into(),
            time: "0.5".into(),
            parts: vec![MessagePart::new(PartKind::Info, "sample :bd_haus")],
        }
    );
}

#[tokio::test]
async fn malformed_and_unknown_messages_are_skipped() {
    let (addr, mut rx) = spawn_relay().await;
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    sender.send_to(b"not osc", addr).await.unwrap();
    sender
        .send_to(&encode("/exited", vec![]), addr)
        .await
        .unwrap();
    sender
        .send_to(&encode("/error", vec![OscType::Int(1)]), addr)
        .await
        .unwrap();
    sender
        .send_to(
            &encode(
                "/multi_message",
                vec![
                    OscType::Int(1),
                    OscType::String("thread".into()),
                    OscType::String("0".into()),
                    OscType::Long(i64::MAX),
                ],
            ),
            addr,
        )
        .await
        .unwrap();
    sender
        .send_to(
            &encode(
                "/error",
                vec![
                    OscType::Int(4),
                    OscType::String("boom".into()),
                    OscType::String("trace".into()),
                    OscType::Int(2),
                ],
            ),
            addr,
        )
        .await
        .unwrap();

    assert_eq!(
        next(&mut rx).await,
        LogEvent::RuntimeError {
            run_id: 4,
            message: "boom".into(),
            trace: "trace".into(),
            line: 2,
        }
    );
}

#[tokio::test]
async fn bundles_are_flattened() {
    let (addr, mut rx) = spawn_relay().await;
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    let info = |text: &str| {
        OscPacket::Message(OscMessage {
            addr: "/info".into(),
            args: vec![OscType::Int(0), OscType::String(text.into())],
        })
    };
    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime {
            seconds: 0,
            fractional: 1,
        },
        content: vec![info("a"), info("b")],
    });
    sender
        .send_to(&rosc::encoder::encode(&bundle).unwrap(), addr)
        .await
        .unwrap();

    for expected in ["a", "b"] {
        assert_eq!(
            next(&mut rx).await,
            LogEvent::Info {
                style: 0,
                text: expected.into()
            }
        );
    }
}

#[tokio::test]
async fn occupied_port_is_reported_as_address_in_use() {
    let holder = StdUdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = holder.local_addr().unwrap();

    let err = LogRelay::bind(addr).await.unwrap_err();
    assert!(matches!(err, RelayError::AddressInUse { addr: a } if a == addr));
}
