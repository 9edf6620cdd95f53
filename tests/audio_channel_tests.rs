// Unit tests for the bounded per-session audio queue.

use meetline::{audio_channel, AudioFrame};
use std::time::Duration;

#[tokio::test]
async fn preserves_push_order_and_terminates() {
    let (tx, mut rx) = audio_channel(10, "session-1");

    tx.push(vec![1]);
    tx.push(vec![2]);
    tx.push(vec![3]);
    tx.close();

    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![1]));
    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![2]));
    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![3]));
    assert_eq!(rx.next().await, AudioFrame::EndOfStream);
}

#[tokio::test]
async fn push_after_close_is_dropped() {
    let (tx, mut rx) = audio_channel(10, "session-1");

    tx.push(vec![1]);
    tx.close();
    tx.push(vec![2]);

    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![1]));
    assert_eq!(rx.next().await, AudioFrame::EndOfStream);
}

#[tokio::test]
async fn close_enqueues_exactly_one_marker() {
    let (tx, mut rx) = audio_channel(10, "session-1");

    tx.close();
    tx.close();

    assert_eq!(rx.next().await, AudioFrame::EndOfStream);

    // Producer is still alive, so anything further would have to be a
    // second marker.
    let extra = tokio::time::timeout(Duration::from_millis(50), rx.next()).await;
    assert!(extra.is_err(), "second end-of-stream marker was enqueued");
}

#[tokio::test]
async fn overflow_drops_instead_of_blocking() {
    let (tx, mut rx) = audio_channel(2, "session-1");

    tx.push(vec![1]);
    tx.push(vec![2]);
    tx.push(vec![3]); // over the high-water mark

    assert_eq!(tx.dropped_chunks(), 1);

    tx.close();

    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![1]));
    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![2]));
    assert_eq!(rx.next().await, AudioFrame::EndOfStream);
}

#[tokio::test]
async fn marker_survives_a_full_queue() {
    let (tx, mut rx) = audio_channel(1, "session-1");

    tx.push(vec![1]);
    tx.close(); // no room for the marker yet

    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![1]));
    assert_eq!(rx.next().await, AudioFrame::EndOfStream);
}

#[tokio::test]
async fn dropped_producer_reads_as_end_of_stream() {
    let (tx, mut rx) = audio_channel(10, "session-1");

    tx.push(vec![7]);
    drop(tx);

    assert_eq!(rx.next().await, AudioFrame::Chunk(vec![7]));
    assert_eq!(rx.next().await, AudioFrame::EndOfStream);
}
