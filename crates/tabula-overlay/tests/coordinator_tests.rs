//! Integration tests for the overlay coordinator over the in-memory substrate.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tabula_core::constants::{
    CHANNEL_CARD_CLOSED, CHANNEL_SHOW_CARD, NS_CONFIG, SAFETY_SURFACE_ID,
};
use tabula_core::effects::BroadcastEffects;
use tabula_core::{BroadcastNotice, SurfaceClosed};
use tabula_effects::MetadataGateway;
use tabula_overlay::{OverlayCoordinator, OverlayTuning};
use tabula_testkit::{
    init_tracing, ManualTime, MemoryBroadcast, MemoryDocumentStore, PresentationCall,
    RecordingPresentation,
};

struct Harness {
    store: MemoryDocumentStore,
    presentation: RecordingPresentation,
    coordinator: OverlayCoordinator,
}

fn harness() -> Harness {
    init_tracing();
    let store = MemoryDocumentStore::new();
    let presentation = RecordingPresentation::new();
    let coordinator = OverlayCoordinator::with_tuning(
        MetadataGateway::new(Arc::new(store.clone())),
        Arc::new(presentation.clone()),
        Arc::new(ManualTime::default()),
        OverlayTuning {
            duration_ms: 4_000,
            failsafe_grace_ms: 750,
        },
    );
    Harness {
        store,
        presentation,
        coordinator,
    }
}

fn notice(n: u32) -> BroadcastNotice {
    BroadcastNotice {
        action_id: "x-card".into(),
        action_label: "X-Card".into(),
        signal_id: format!("ev_{n}"),
        sender_id: Some("player-1".into()),
    }
}

fn our_surface_closed() -> SurfaceClosed {
    SurfaceClosed {
        surface: SAFETY_SURFACE_ID.into(),
        closed_at_ms: 0,
        sender_id: Some("player-1".into()),
    }
}

#[tokio::test(start_paused = true)]
async fn three_notices_display_sequentially_never_overlapping() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(2)).await;
    h.coordinator.handle_notice(notice(3)).await;
    assert_eq!(h.presentation.open_count(), 1);

    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 2);

    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 3);

    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn duplicate_notice_is_ignored() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(1)).await;
    assert_eq!(h.presentation.open_count(), 1);

    // Nothing was queued by the duplicate: closing leaves the surface idle.
    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn distinct_ids_after_a_duplicate_still_display() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(2)).await;

    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn failsafe_fires_when_the_handshake_is_lost() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(2)).await;
    assert_eq!(h.presentation.open_count(), 1);

    // No handshake arrives; the fail-safe (duration + grace) advances the
    // queue on its own.
    tokio::time::sleep(Duration::from_millis(4_800)).await;
    assert_eq!(h.presentation.open_count(), 2);

    tokio::time::sleep(Duration::from_millis(4_800)).await;
    // Queue exhausted: back to idle, nothing further opens.
    assert_eq!(h.presentation.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn handshake_cancels_the_failsafe() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 1);

    // Were the fail-safe still armed it would fire here and re-drain; the
    // open count staying put shows it was cancelled.
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(h.presentation.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn open_failure_drops_the_item_and_recovers() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    assert_eq!(h.presentation.open_count(), 1);

    // Two more arrive while showing, then the host starts failing opens.
    h.coordinator.handle_notice(notice(2)).await;
    h.coordinator.handle_notice(notice(3)).await;
    h.presentation.fail_opens(true);

    // Both queued items fail in turn, are dropped, and the coordinator ends
    // Idle rather than stuck Showing.
    h.coordinator.handle_surface_closed(our_surface_closed()).await;
    assert_eq!(h.presentation.open_count(), 1);

    // Proof of Idle: a fresh notice displays as soon as opens work again.
    h.presentation.fail_opens(false);
    h.coordinator.handle_notice(notice(4)).await;
    assert_eq!(h.presentation.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unrelated_surface_closures_are_ignored() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    h.coordinator.handle_notice(notice(2)).await;

    h.coordinator
        .handle_surface_closed(SurfaceClosed {
            surface: "some-other-extension".into(),
            closed_at_ms: 0,
            sender_id: None,
        })
        .await;
    assert_eq!(h.presentation.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_surface_is_closed_before_each_open() {
    let h = harness();

    h.coordinator.handle_notice(notice(1)).await;
    let calls = h.presentation.calls();
    assert_eq!(
        calls.first(),
        Some(&PresentationCall::Close {
            surface: SAFETY_SURFACE_ID.into()
        })
    );
    assert!(matches!(calls.get(1), Some(PresentationCall::Open { .. })));
}

#[tokio::test(start_paused = true)]
async fn custom_artwork_override_reaches_the_descriptor() {
    let h = harness();
    let mut doc = h.store.snapshot();
    doc.insert(
        NS_CONFIG.into(),
        json!({ "customImages": { "x-card": "/cards/table-custom.svg" } }),
    );
    h.store.inject(doc);

    h.coordinator.handle_notice(notice(1)).await;

    let urls = h.presentation.opened_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("actionId=x-card"));
    assert!(urls[0].contains("&image=%2Fcards%2Ftable-custom.svg"));
}

#[tokio::test(start_paused = true)]
async fn attach_consumes_broadcasts_until_cleanup() {
    let h = harness();
    let bus = MemoryBroadcast::new();
    h.coordinator.attach(&bus);

    bus.send(
        CHANNEL_SHOW_CARD,
        serde_json::to_value(notice(1)).unwrap(),
    )
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(h.presentation.open_count(), 1);

    bus.send(
        CHANNEL_SHOW_CARD,
        serde_json::to_value(notice(2)).unwrap(),
    )
    .await
    .unwrap();
    bus.send(
        CHANNEL_CARD_CLOSED,
        serde_json::to_value(our_surface_closed()).unwrap(),
    )
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(h.presentation.open_count(), 2);

    // Malformed payloads are skipped without killing the listener.
    bus.send(CHANNEL_SHOW_CARD, json!({ "weird": true })).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(h.presentation.open_count(), 2);

    h.coordinator.cleanup();
    h.coordinator.cleanup();
    bus.send(
        CHANNEL_SHOW_CARD,
        serde_json::to_value(notice(3)).unwrap(),
    )
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(h.presentation.open_count(), 2);
}
