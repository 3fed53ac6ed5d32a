#![cfg(feature = "test-utils")]

use std::time::Duration;

use handoff::concurrency::channel::RendezvousChannel;
use handoff::error::ErrorKind;
use handoff::test_utils::tracing::init_test_tracing;
use tokio::time::{sleep, timeout};

#[tokio::test(flavor = "multi_thread")]
async fn spawned_sender_completes_the_rendezvous() {
    init_test_tracing();

    let channel = RendezvousChannel::new();

    // The sender must live on its own task before the receive is attempted;
    // with both sides on one task the exchange could never pair up.
    let sender = channel.clone();
    tokio::spawn(async move {
        sender.send("Hello world!".to_string()).await.unwrap();
    });

    let greeting = timeout(Duration::from_secs(5), channel.recv())
        .await
        .expect("rendezvous with a scheduled sender must complete");
    assert_eq!(greeting.as_deref(), Some("Hello world!"));
}

#[tokio::test(flavor = "multi_thread")]
async fn send_without_a_scheduled_receiver_never_completes() {
    init_test_tracing();

    let channel: RendezvousChannel<u32> = RendezvousChannel::new();

    // No receiver task exists anywhere, so the send must hang; the bounded
    // wait asserts non-completion rather than success.
    let result = timeout(Duration::from_millis(200), channel.send(1)).await;
    assert!(
        result.is_err(),
        "a rendezvous with no scheduled partner must block forever"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn recv_without_a_scheduled_sender_never_completes() {
    init_test_tracing();

    let channel: RendezvousChannel<u32> = RendezvousChannel::new();

    let result = timeout(Duration::from_millis(200), channel.recv()).await;
    assert!(
        result.is_err(),
        "a rendezvous with no scheduled partner must block forever"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn single_pair_delivers_every_item_in_send_order() {
    init_test_tracing();

    let channel = RendezvousChannel::new();

    let sender = channel.clone();
    let producer = tokio::spawn(async move {
        for n in 1..=25u32 {
            sender.send(n).await.unwrap();
        }
        sender.close().await.unwrap();
    });

    let mut received = Vec::new();
    while let Some(n) = channel.recv().await {
        received.push(n);
    }
    producer.await.unwrap();

    assert_eq!(received, (1..=25).collect::<Vec<_>>());
    assert_eq!(channel.delivered().await, 25);
}

#[tokio::test(flavor = "multi_thread")]
async fn recv_after_close_returns_end_of_stream_repeatedly() {
    init_test_tracing();

    let channel: RendezvousChannel<u32> = RendezvousChannel::new();
    channel.close().await.unwrap();

    for _ in 0..3 {
        let got = timeout(Duration::from_millis(200), channel.recv())
            .await
            .expect("recv on a closed empty channel must not block");
        assert_eq!(got, None);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn send_on_a_closed_channel_is_a_usage_fault() {
    init_test_tracing();

    let channel = RendezvousChannel::new();
    channel.close().await.unwrap();

    let err = channel.send(1u32).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SendOnClosedChannel);
}

#[tokio::test(flavor = "multi_thread")]
async fn closing_twice_is_a_usage_fault() {
    init_test_tracing();

    let channel: RendezvousChannel<u32> = RendezvousChannel::new();
    channel.close().await.unwrap();

    let err = channel.close().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ChannelAlreadyClosed);
}

#[tokio::test(flavor = "multi_thread")]
async fn closing_with_a_blocked_sender_faults_the_sender() {
    init_test_tracing();

    let channel = RendezvousChannel::new();

    let sender = channel.clone();
    let blocked = tokio::spawn(async move { sender.send(7u32).await });

    // Let the sender reach its in-flight state before pulling the rug.
    sleep(Duration::from_millis(100)).await;
    channel.close().await.unwrap();

    let err = blocked.await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SendOnClosedChannel);
    assert_eq!(channel.delivered().await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn every_pending_receiver_observes_end_of_stream() {
    init_test_tracing();

    let channel: RendezvousChannel<u32> = RendezvousChannel::new();

    let first = {
        let channel = channel.clone();
        tokio::spawn(async move { channel.recv().await })
    };
    let second = {
        let channel = channel.clone();
        tokio::spawn(async move { channel.recv().await })
    };

    // Let both receivers park before the close.
    sleep(Duration::from_millis(100)).await;
    channel.close().await.unwrap();

    assert_eq!(first.await.unwrap(), None);
    assert_eq!(second.await.unwrap(), None);
}
