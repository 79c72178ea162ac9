//! End-to-end runs of the orchestrator against the null ledger client:
//! checkpoint discovery → build → checkpoint → close → broadcast → cleanup.

use std::collections::HashMap;

use subgen_engine::{
    stop_channel, EngineError, GeneratorConfig, Orchestrator, PublishError, RunMode,
};
use subgen_nullables::{BroadcastPolicy, NullCheckpointStore, NullLedgerClient};
use subgen_store::{CheckpointStore, FileCheckpointStore};
use subgen_types::{Frontier, Record, RecordHash, Subtangle};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config(records: usize, window: usize) -> GeneratorConfig {
    GeneratorConfig {
        records,
        window,
        broadcast_interval_ms: 0,
        ..Default::default()
    }
}

fn frontier(a: u8, b: u8) -> Frontier {
    Frontier::new(RecordHash::new([a; 32]), RecordHash::new([b; 32]))
}

/// Build a subtangle with a throwaway client, as a previous run would have.
async fn previous_run(records: usize) -> Subtangle {
    let client = NullLedgerClient::new();
    let store = NullCheckpointStore::new();
    let mut orchestrator = Orchestrator::new(&config(records, 30), client, store)
        .unwrap()
        .with_seed(99);
    orchestrator.run(None).await.unwrap();
    let mut accepted = orchestrator.client().accepted();
    accepted.pop();
    accepted
}

fn positions(records: &[Record]) -> HashMap<RecordHash, usize> {
    records.iter().enumerate().map(|(i, r)| (r.hash, i)).collect()
}

// ---------------------------------------------------------------------------
// Fresh runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_run_builds_then_publishes_with_closing_record() {
    let build_tips = frontier(0xA1, 0xB1);
    let close_tips = frontier(0xC1, 0xD1);
    let client = NullLedgerClient::new().with_frontiers(vec![build_tips, close_tips]);
    let mut orchestrator = Orchestrator::new(&config(3, 30), client, NullCheckpointStore::new())
        .unwrap()
        .with_seed(1);

    let outcome = orchestrator.run(None).await.unwrap();

    assert_eq!(outcome.mode, RunMode::Fresh);
    assert_eq!(outcome.records, 3);
    assert_eq!(outcome.report.published, 4);

    let published = orchestrator.client().accepted();
    assert_eq!(published.len(), 4);
    assert_eq!(published[0].parents(), (build_tips.trunk, build_tips.branch));
    assert_eq!(published[1].parents(), (published[0].hash, published[0].hash));
    let index = positions(&published);
    assert!(index[&published[2].trunk] <= 1);
    assert!(index[&published[2].branch] <= 1);
    assert_eq!(published[3].parents(), (close_tips.trunk, published[2].hash));

    assert_eq!(orchestrator.store().save_count(), 1);
    assert!(orchestrator.store().snapshot().is_none());
}

#[tokio::test]
async fn build_frontier_used_only_by_first_record() {
    let tips = frontier(0x11, 0x22);
    let client = NullLedgerClient::new().with_frontiers(vec![tips, frontier(0x33, 0x44)]);
    let mut orchestrator = Orchestrator::new(&config(40, 4), client, NullCheckpointStore::new())
        .unwrap()
        .with_seed(2);
    orchestrator.run(None).await.unwrap();

    let published = orchestrator.client().accepted();
    for record in &published[1..] {
        assert!(!tips.contains(&record.trunk));
        assert!(!tips.contains(&record.branch));
    }
}

#[tokio::test]
async fn fresh_run_with_file_checkpoint_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtangle.snap");
    let mut orchestrator = Orchestrator::new(
        &config(6, 30),
        NullLedgerClient::new(),
        FileCheckpointStore::new(&path),
    )
    .unwrap();

    let outcome = orchestrator.run(None).await.unwrap();

    assert_eq!(outcome.report.total(), 7);
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// Resume
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkpoint_at_startup_skips_builder() {
    let existing = previous_run(5).await;
    let client = NullLedgerClient::new();
    let store = NullCheckpointStore::with_checkpoint(existing.clone());
    let mut orchestrator = Orchestrator::new(&config(50, 30), client, store).unwrap();

    let outcome = orchestrator.run(None).await.unwrap();

    assert_eq!(outcome.mode, RunMode::Resume);
    assert_eq!(outcome.records, 5);
    // Only the closing record was attached, and only its tips were fetched.
    assert_eq!(orchestrator.client().attached().len(), 1);
    assert_eq!(orchestrator.client().tip_requests(), 1);
    assert_eq!(orchestrator.store().save_count(), 0);

    let published = orchestrator.client().accepted();
    assert_eq!(&published[..5], &existing[..]);
    assert_eq!(published.len(), 6);
}

#[tokio::test]
async fn resume_from_file_closes_on_persisted_last_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCheckpointStore::new(dir.path().join("subtangle.snap"));
    let existing = previous_run(4).await;
    store.save(&existing).unwrap();

    let mut orchestrator =
        Orchestrator::new(&config(50, 30), NullLedgerClient::new(), store.clone()).unwrap();
    orchestrator.run(None).await.unwrap();

    let published = orchestrator.client().accepted();
    assert_eq!(published[4].branch, existing[3].hash);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn corrupted_checkpoint_is_fatal() {
    let mut orchestrator = Orchestrator::new(
        &config(5, 30),
        NullLedgerClient::new(),
        NullCheckpointStore::corrupted(),
    )
    .unwrap();

    let err = orchestrator.run(None).await.unwrap_err();

    assert!(matches!(err, EngineError::Checkpoint(_)));
    assert!(orchestrator.client().attached().is_empty());
}

#[tokio::test]
async fn failed_build_leaves_checkpoint_for_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCheckpointStore::new(dir.path().join("subtangle.snap"));

    let failing = NullLedgerClient::new().failing_attach_after(4);
    let mut first = Orchestrator::new(&config(10, 30), failing, store.clone()).unwrap();
    assert!(matches!(first.run(None).await, Err(EngineError::Build(_))));
    let partial = store.load().unwrap().expect("partial work checkpointed");
    assert_eq!(partial.len(), 4);

    let mut second = Orchestrator::new(&config(10, 30), NullLedgerClient::new(), store.clone()).unwrap();
    let outcome = second.run(None).await.unwrap();
    assert_eq!(outcome.mode, RunMode::Resume);
    assert_eq!(outcome.records, 4);
}

#[tokio::test]
async fn closing_failure_discards_built_fragment() {
    let client = NullLedgerClient::new().failing_attach_after(3);
    let mut orchestrator = Orchestrator::new(&config(3, 30), client, NullCheckpointStore::new())
        .unwrap()
        .with_seed(4);

    let err = orchestrator.run(None).await.unwrap_err();

    assert!(matches!(err, EngineError::Publish(PublishError::Close(_))));
    assert_eq!(orchestrator.client().attached().len(), 3);
    assert!(orchestrator.client().broadcast_attempts().is_empty());
    assert_eq!(orchestrator.store().save_count(), 1);
    assert_eq!(orchestrator.store().clear_count(), 1);
    assert!(orchestrator.store().snapshot().is_none());
}

// ---------------------------------------------------------------------------
// Interruption and failing networks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn interrupt_after_eighth_record_publishes_nine() {
    let (handle, signal) = stop_channel();
    let client = NullLedgerClient::new().on_attach(8, move || {
        handle.fire();
    });
    let retain = GeneratorConfig {
        retain: true,
        ..config(0, 30)
    };
    let mut orchestrator = Orchestrator::new(&retain, client, NullCheckpointStore::new()).unwrap();

    let outcome = orchestrator.run(Some(signal)).await.unwrap();

    assert_eq!(outcome.mode, RunMode::Fresh);
    assert_eq!(outcome.records, 8);
    assert_eq!(outcome.report.published, 9);
    assert_eq!(orchestrator.store().save_count(), 1);
}

#[tokio::test]
async fn network_rejecting_everything_still_terminates_and_clears() {
    let client = NullLedgerClient::new().with_broadcast_policy(BroadcastPolicy::RejectAll);
    let mut orchestrator = Orchestrator::new(&config(6, 30), client, NullCheckpointStore::new()).unwrap();

    let outcome = orchestrator.run(None).await.unwrap();

    assert_eq!(outcome.report.published, 0);
    assert_eq!(outcome.report.failed, 7);
    assert_eq!(orchestrator.client().broadcast_attempts().len(), 7 * 5);
    assert!(orchestrator.store().snapshot().is_none());
    assert_eq!(orchestrator.store().clear_count(), 1);
}

#[tokio::test]
async fn invalid_config_rejected_before_running() {
    let bad = GeneratorConfig {
        window: 0,
        ..Default::default()
    };
    let result = Orchestrator::new(&bad, NullLedgerClient::new(), NullCheckpointStore::new());
    assert!(matches!(result, Err(EngineError::Config(_))));
}
