//! End-to-end durability: consent survives a controller restart through the
//! file store.

use std::sync::Arc;

use anyhow::Result;
use greenlight_consent::{ConsentConfig, ConsentController, ConsentStatus};
use greenlight_runtime::testing::{RecordingBus, RecordingPublisher};
use greenlight_runtime::{Event, EventSource, EventType};
use serde_json::json;

fn boot(config: ConsentConfig) -> (Arc<RecordingBus>, Arc<RecordingPublisher>, Arc<ConsentController>) {
    let bus = Arc::new(RecordingBus::new());
    let publisher = Arc::new(RecordingPublisher::new());
    let controller = ConsentController::with_file_store(config, bus.clone(), publisher.clone());
    controller.register();
    (bus, publisher, controller)
}

#[test]
fn record_survives_restart_and_is_republished() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ConsentConfig::builder()
        .store_path(dir.path().join("consent.json"))
        .build();

    // First run: absorb an update.
    let (bus, _, controller) = boot(config.clone());
    bus.deliver(
        Event::new("Consent Update", EventType::ConsentUpdate, EventSource::RequestContent)
            .with_payload(json!({
                "consents": {
                    "collect": {"val": "n"},
                    "metadata": {"time": "2026-08-06T09:00:00+00:00"}
                }
            })),
    );
    assert_eq!(
        controller.current().status("collect"),
        Some(ConsentStatus::No)
    );
    drop(controller);

    // Second run against the same path: the persisted posture comes back and
    // is republished at registration.
    let (_, publisher, controller) = boot(config);
    let record = controller.current();
    assert_eq!(record.status("collect"), Some(ConsentStatus::No));
    assert_eq!(
        record.last_updated.map(|t| t.to_rfc3339()),
        Some("2026-08-06T09:00:00+00:00".to_string())
    );

    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].state["consents"]["collect"]["val"], "n");
    Ok(())
}
