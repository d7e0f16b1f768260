//! Batcher pipeline integration tests
//!
//! Time-sensitive tests run on a paused clock so linger windows and retry
//! delays advance deterministically.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{batching, batching_with_timeout, no_retry, retries};
    use crate::common::{BatchAssertions, FailingSink, GatedSink};
    use microbatch_rs::{BatchError, Batcher};
    use std::sync::Arc;
    use std::time::Duration;

    // ==================== Batch shaping ====================

    /// Items arriving while the sink is busy are batched on the next round
    #[tokio::test(start_paused = true)]
    async fn test_items_queued_during_delivery_form_next_batches() {
        let sink = Arc::new(GatedSink::new());
        let batcher = Batcher::<i32>::start(&batching(20, 4, 5), &no_retry(), sink.clone()).unwrap();

        batcher.submit(1).await.unwrap();
        // Linger elapses; the assembler is now stuck inside the sink
        tokio::time::sleep(Duration::from_millis(10)).await;

        for i in 2..=10 {
            batcher.submit(i).await.unwrap();
        }
        assert_eq!(batcher.queue_depth(), 9);

        sink.open();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(
            sink.batches(),
            vec![vec![1], vec![2, 3, 4, 5], vec![6, 7, 8, 9], vec![10]]
        );
        batcher.shutdown().await.unwrap();
    }

    /// Many producers, tiny queue: nothing lost, nothing reordered per producer
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_conserve_items() {
        const PRODUCERS: i32 = 8;
        const PER_PRODUCER: i32 = 100;
        const STRIDE: i32 = 1_000;

        let sink = Arc::new(GatedSink::new());
        sink.open();
        let batcher = Arc::new(
            Batcher::<i32>::start(&batching(8, 4, 1), &no_retry(), sink.clone()).unwrap(),
        );

        let mut producers = tokio::task::JoinSet::new();
        for p in 0..PRODUCERS {
            let batcher = batcher.clone();
            producers.spawn(async move {
                for seq in 0..PER_PRODUCER {
                    batcher.submit(p * STRIDE + seq).await.unwrap();
                }
            });
        }
        while let Some(result) = producers.join_next().await {
            result.unwrap();
        }
        batcher.shutdown().await.unwrap();

        let batches = sink.batches();
        batches.assert_batch_sizes(4);
        batches.assert_producer_order(PRODUCERS, PER_PRODUCER, STRIDE);

        let stats = batcher.stats();
        assert_eq!(stats.accepted, (PRODUCERS * PER_PRODUCER) as u64);
        assert_eq!(stats.items_delivered, stats.accepted);
        assert_eq!(stats.batches_delivered, batches.len() as u64);
    }

    // ==================== Backpressure ====================

    #[tokio::test(start_paused = true)]
    async fn test_slow_sink_pushes_back_on_producers() {
        let sink = Arc::new(GatedSink::new());
        let batcher = Batcher::<i32>::start(
            &batching_with_timeout(4, 2, 1, 20),
            &no_retry(),
            sink.clone(),
        )
        .unwrap();

        batcher.submit(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        for i in 2..=5 {
            batcher.submit(i).await.unwrap();
        }
        let err = batcher.submit(6).await.unwrap_err();
        assert!(matches!(err, BatchError::QueueFull { .. }));

        let stats = batcher.stats();
        assert_eq!(stats.accepted, 5);
        assert_eq!(stats.rejected_full, 1);
        assert_eq!(stats.queue_depth, 4);

        sink.open();
        batcher.shutdown().await.unwrap();

        assert_eq!(sink.items(), vec![1, 2, 3, 4, 5]);
        sink.batches().assert_batch_sizes(2);
    }

    // ==================== Delivery failures ====================

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let sink = Arc::new(FailingSink::new(2));
        let batcher = Batcher::<i32>::start(&batching(10, 5, 5), &retries(3), sink.clone()).unwrap();

        batcher.submit(1).await.unwrap();
        batcher.submit(2).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(sink.calls(), 3);
        assert_eq!(sink.batches(), vec![vec![1, 2]]);

        let stats = batcher.stats();
        assert_eq!(stats.batches_delivered, 1);
        assert_eq!(stats.delivery_retries, 2);
        assert_eq!(stats.delivery_failures, 0);
        batcher.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_failure_drops_batch_and_keeps_running() {
        let sink = Arc::new(FailingSink::always());
        let batcher = Batcher::<i32>::start(&batching(10, 5, 5), &retries(2), sink.clone()).unwrap();

        batcher.submit(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        batcher.submit(2).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(sink.calls(), 4);
        assert!(batcher.is_running());

        let stats = batcher.stats();
        assert_eq!(stats.delivery_failures, 2);
        assert_eq!(stats.items_dropped, 2);
        assert_eq!(stats.items_delivered, 0);
        batcher.shutdown().await.unwrap();
    }

    // ==================== Shutdown ====================

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_rejects_new_items_while_flushing() {
        let sink = Arc::new(GatedSink::new());
        let batcher = Arc::new(
            Batcher::<i32>::start(&batching(10, 3, 1_000), &no_retry(), sink.clone()).unwrap(),
        );

        for i in 1..=7 {
            batcher.submit(i).await.unwrap();
        }

        let stopping = {
            let batcher = batcher.clone();
            tokio::spawn(async move { batcher.shutdown().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!batcher.is_running());
        assert_eq!(batcher.submit(8).await.unwrap_err(), BatchError::ShuttingDown);

        sink.open();
        stopping.await.unwrap().unwrap();

        assert_eq!(sink.batches(), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(batcher.stats().rejected_shutdown, 1);
    }
}
