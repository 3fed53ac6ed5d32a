#![cfg(feature = "test-utils")]

use std::time::Duration;

use handoff::concurrency::barrier::CompletionBarrier;
use handoff::concurrency::channel::RendezvousChannel;
use handoff::concurrency::delay::RandomDelay;
use handoff::config::PipelineConfig;
use handoff::error::ErrorKind;
use handoff::pipeline::Pipeline;
use handoff::sink::memory::MemorySink;
use handoff::test_utils::tracing::init_test_tracing;
use handoff::workers::base::{Worker, WorkerHandle};
use handoff::workers::producer::ProducerWorker;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{sleep, timeout};

#[tokio::test(flavor = "multi_thread")]
async fn single_producer_stream_reaches_eleven_in_order() {
    init_test_tracing();

    let sink = MemorySink::new();
    let config = PipelineConfig {
        producer_count: 1,
        consumer_count: 1,
        items_per_producer: 11,
        produce_delay_ms: 0,
        consume_delay_ms: 5,
        await_consumers: true,
        seed: 42,
    };

    let mut pipeline = Pipeline::new(1, config, sink.clone());
    pipeline.start().await.unwrap();

    let report = timeout(Duration::from_secs(10), pipeline.wait())
        .await
        .expect("pipeline must terminate")
        .unwrap();

    // The wait only returned once the producer signaled after its eleventh
    // send, so every send is already reflected in the report.
    assert_eq!(report.items_sent, 11);
    assert_eq!(report.items_delivered, 11);
    assert_eq!(report.items_recorded, Some(11));

    let seqs: Vec<u32> = sink.items().await.iter().map(|item| item.seq).collect();
    assert_eq!(seqs, (1..=11).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread")]
async fn many_to_many_pipeline_completes_every_send() {
    init_test_tracing();

    let sink = MemorySink::new();
    let config = PipelineConfig {
        producer_count: 4,
        consumer_count: 2,
        items_per_producer: 8,
        produce_delay_ms: 10,
        consume_delay_ms: 10,
        await_consumers: false,
        seed: 7,
    };

    let mut pipeline = Pipeline::new(2, config, sink.clone());
    pipeline.start().await.unwrap();

    let report = timeout(Duration::from_secs(10), pipeline.wait())
        .await
        .expect("pipeline must terminate")
        .unwrap();

    assert_eq!(report.items_sent, 32);
    assert_eq!(report.items_delivered, 32);
    // Consumers were not awaited; whatever they had not recorded when the
    // production side finished is accepted loss.
    assert!(report.items_recorded.is_none());
    assert!(sink.len().await <= 32);
}

#[tokio::test(flavor = "multi_thread")]
async fn awaiting_consumers_loses_no_items() {
    init_test_tracing();

    let sink = MemorySink::new();
    let config = PipelineConfig {
        producer_count: 3,
        consumer_count: 2,
        items_per_producer: 5,
        produce_delay_ms: 5,
        consume_delay_ms: 5,
        await_consumers: true,
        seed: 13,
    };

    let mut pipeline = Pipeline::new(3, config, sink.clone());
    pipeline.start().await.unwrap();

    let report = timeout(Duration::from_secs(10), pipeline.wait())
        .await
        .expect("pipeline must terminate")
        .unwrap();

    assert_eq!(report.items_sent, 15);
    assert_eq!(report.items_recorded, Some(15));
    assert_eq!(sink.len().await, 15);
}

#[tokio::test(flavor = "multi_thread")]
async fn closing_before_producers_finish_faults_a_producer() {
    init_test_tracing();

    let channel = RendezvousChannel::new();
    let barrier = CompletionBarrier::new();
    barrier.expect(1).await.unwrap();

    let worker = ProducerWorker::new(
        0,
        4,
        RandomDelay::none(),
        channel.clone(),
        barrier.clone(),
        StdRng::seed_from_u64(0),
    );
    let handle = worker.start().await.unwrap();

    // No consumer exists, so the producer is parked in its first handoff;
    // closing now is exactly the misordered shutdown.
    sleep(Duration::from_millis(100)).await;
    channel.close().await.unwrap();

    let err = timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("faulted producer must still terminate")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SendOnClosedChannel);

    // The producer reported completion on its failure path too, so the
    // barrier still releases.
    timeout(Duration::from_secs(1), barrier.wait())
        .await
        .expect("barrier must release after the producer's exit signal")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_with_no_producers_returns_immediately() {
    init_test_tracing();

    let sink = MemorySink::new();
    let config = PipelineConfig {
        producer_count: 0,
        consumer_count: 1,
        items_per_producer: 8,
        produce_delay_ms: 0,
        consume_delay_ms: 0,
        await_consumers: true,
        seed: 0,
    };

    let mut pipeline = Pipeline::new(4, config, sink.clone());
    pipeline.start().await.unwrap();

    let report = timeout(Duration::from_secs(5), pipeline.wait())
        .await
        .expect("a zero-producer pipeline must not block")
        .unwrap();

    assert_eq!(report.items_sent, 0);
    assert_eq!(report.items_recorded, Some(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_before_start_reports_nothing() {
    init_test_tracing();

    let pipeline = Pipeline::new(5, PipelineConfig::default(), MemorySink::new());

    let report = pipeline.wait().await.unwrap();
    assert_eq!(report.items_sent, 0);
    assert_eq!(report.items_delivered, 0);
}
