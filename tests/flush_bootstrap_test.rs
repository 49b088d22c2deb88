//! Bootstrap flush: collapsing sequence gaps into a terminal state.

use std::time::Duration;

use tokio::time::timeout;

use seqstore::Any;
use seqstore::Op;
use seqstore::Store;
use seqstore::StoreError;
use seqstore::NOP_MUTATION;

const RECV_TIMEOUT: Duration = Duration::from_millis(300);

async fn send(store: &Store, seqn: i64, mutation: &str) {
    store
        .ops()
        .send(Op {
            seqn,
            mutation: mutation.to_string(),
        })
        .await
        .expect("ops send");
}

#[tokio::test]
async fn test_flush_collapses_gaps_to_the_last_seqn() {
    let store = Store::new();
    send(&store, 5, "0:/a=x").await;
    send(&store, 8, "0:/b=y").await;

    let version = store.flush().await.unwrap();
    assert_eq!(version, 8);
    assert_eq!(store.get("/a"), (vec!["x".to_string()], 5));
    assert_eq!(store.get("/b"), (vec!["y".to_string()], 8));
    assert_eq!(store.seqns().await.unwrap(), 8);
}

#[tokio::test]
async fn test_flush_does_not_notify_watchers() {
    let store = Store::new();
    let mut events = store.watch(Any).await.unwrap();

    send(&store, 3, "0:/a=x").await;
    store.flush().await.unwrap();

    let res = timeout(RECV_TIMEOUT, events.recv()).await;
    assert!(res.is_err(), "flush must not deliver events to watchers");

    // Normal operation resumes after the flush.
    send(&store, 4, "0:/b=y").await;
    let ev = timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(ev.seqn, 4);
}

#[tokio::test]
async fn test_watches_cannot_start_inside_a_collapsed_gap() {
    let store = Store::new();
    send(&store, 5, "0:/a=x").await;
    store.flush().await.unwrap();

    assert_eq!(store.wait(3).await.err(), Some(StoreError::TooLate));
    assert_eq!(
        store.watch_from(Any, 5).await.err(),
        Some(StoreError::TooLate)
    );

    // The next live seqn is fine.
    let _handle = store.watch_from(Any, 6).await.unwrap();
}

#[tokio::test]
async fn test_flush_on_empty_queue_is_harmless() {
    let store = Store::new();
    assert_eq!(store.flush().await.unwrap(), 0);
    assert_eq!(store.seqns().await.unwrap(), 0);
}

#[tokio::test]
async fn test_nop_fills_a_gap_without_changing_state() {
    let store = Store::new();
    let mut events = store
        .watch(seqstore::Glob::compile("/**").unwrap())
        .await
        .unwrap();

    send(&store, 1, "0:/a=x").await;
    send(&store, 2, NOP_MUTATION).await;
    send(&store, 3, "1:/a=y").await;

    let mut seqns = Vec::new();
    for _ in 0..2 {
        let ev = timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("timed out")
            .expect("closed");
        seqns.push(ev.seqn);
    }
    // The nop event carries an empty path, which no glob matches; the
    // sequence still advances through it.
    assert_eq!(seqns, vec![1, 3]);
    assert_eq!(store.get("/a"), (vec!["y".to_string()], 3));
}
