//! BDD step definitions for listing and inspecting a backup store.

use backupstore::backup_url;
use backupstore::layout;
use backupstore::test_support::MEMORY_BASE_URL;
use backupstore::{InspectOrchestrator, ListOrchestrator};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{Outcome, StoreContext, backup_record, error_kind, volume_record};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a volume \"{volume}\" owned by driver \"{driver}\"")]
fn seeded_volume(store_context: StoreContext, volume: String, driver: String) -> StoreContext {
    store_context
        .store
        .put_volume(&volume_record(&volume, &driver))
        .expect("seed volume record");
    store_context
}

#[given("a backup \"{backup}\" of volume \"{volume}\"")]
fn seeded_backup(store_context: StoreContext, backup: String, volume: String) -> StoreContext {
    store_context
        .store
        .put_backup(&backup_record(&backup, &volume))
        .expect("seed backup record");
    store_context
}

#[given("an unreadable backup \"{backup}\" of volume \"{volume}\"")]
fn unreadable_backup(store_context: StoreContext, backup: String, volume: String) -> StoreContext {
    store_context
        .store
        .put_backup(&backup_record(&backup, &volume))
        .expect("seed backup record");
    store_context
        .store
        .fail_read(layout::backup_config_path(&backup, &volume));
    store_context
}

#[when("I list volume \"{volume}\" expecting driver \"{driver}\"")]
fn list_volume(mut store_context: StoreContext, volume: String, driver: String) -> StoreContext {
    let registry = store_context.store.registry();
    let result = ListOrchestrator::new(&registry).list(&volume, MEMORY_BASE_URL, &driver);
    store_context.listing = Some(Outcome::from(result));
    store_context
}

#[when("I list all volumes expecting driver \"{driver}\"")]
fn list_all(mut store_context: StoreContext, driver: String) -> StoreContext {
    let registry = store_context.store.registry();
    let result = ListOrchestrator::new(&registry).list("", MEMORY_BASE_URL, &driver);
    store_context.listing = Some(Outcome::from(result));
    store_context
}

#[when("I inspect backup \"{backup}\" of volume \"{volume}\"")]
fn inspect(mut store_context: StoreContext, backup: String, volume: String) -> StoreContext {
    let registry = store_context.store.registry();
    let url = backup_url::encode(&backup, &volume, MEMORY_BASE_URL);
    let result = InspectOrchestrator::new(&registry).inspect_backup(&url);
    store_context.inspection = Some(Outcome::from(result));
    store_context
}

#[then("the listing contains volumes \"{volumes}\"")]
fn listing_contains(store_context: &StoreContext, volumes: String) -> Result<(), StepError> {
    let Some(Outcome::Success(listing)) = &store_context.listing else {
        return Err(StepError::Assertion(format!(
            "expected a successful listing, got {:?}",
            store_context.listing
        )));
    };
    let expected: Vec<&str> = volumes.split(',').map(str::trim).collect();
    let actual: Vec<&str> = listing.keys().map(String::as_str).collect();
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected volumes {expected:?}, got {actual:?}"
        )))
    }
}

#[then("volume \"{volume}\" lists {count:u32} backups without provenance")]
fn volume_lists_backups(
    store_context: &StoreContext,
    volume: String,
    count: u32,
) -> Result<(), StepError> {
    let expected = usize::try_from(count).map_err(|err| StepError::Assertion(err.to_string()))?;
    let Some(Outcome::Success(listing)) = &store_context.listing else {
        return Err(StepError::Assertion(String::from(
            "expected a successful listing",
        )));
    };
    let info = listing
        .get(&volume)
        .ok_or_else(|| StepError::Assertion(format!("volume {volume} missing from listing")))?;
    if info.backups.len() != expected {
        return Err(StepError::Assertion(format!(
            "expected {count} backups for {volume}, got {}",
            info.backups.len()
        )));
    }

    for (url, summary) in &info.backups {
        let value = serde_json::to_value(summary)
            .map_err(|err| StepError::Assertion(err.to_string()))?;
        if value.get("VolumeName").is_some() {
            return Err(StepError::Assertion(format!(
                "list entry {url} carries volume provenance"
            )));
        }
        if url != &backup_url::encode(&summary.name, &volume, MEMORY_BASE_URL) {
            return Err(StepError::Assertion(format!(
                "backup {} keyed by unexpected URL {url}",
                summary.name
            )));
        }
    }
    Ok(())
}

#[then("the listing fails with \"{kind}\"")]
fn listing_fails(store_context: &StoreContext, kind: String) -> Result<(), StepError> {
    match &store_context.listing {
        Some(Outcome::Failure(err)) if error_kind(err) == kind => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected {kind} failure, got {other:?}"
        ))),
    }
}

#[then("the store was never contacted")]
fn store_untouched(store_context: &StoreContext) -> Result<(), StepError> {
    match store_context.store.call_count() {
        0 => Ok(()),
        calls => Err(StepError::Assertion(format!(
            "expected no backend calls, got {calls}"
        ))),
    }
}

#[then("the inspected backup belongs to volume \"{volume}\" of driver \"{driver}\"")]
fn inspected_provenance(
    store_context: &StoreContext,
    volume: String,
    driver: String,
) -> Result<(), StepError> {
    let Some(Outcome::Success(detail)) = &store_context.inspection else {
        return Err(StepError::Assertion(format!(
            "expected a successful inspection, got {:?}",
            store_context.inspection
        )));
    };
    if detail.volume.volume_name == volume && detail.volume.volume_driver == driver {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected provenance {:?}",
            detail.volume
        )))
    }
}

#[then("the inspection fails with \"{kind}\"")]
fn inspection_fails(store_context: &StoreContext, kind: String) -> Result<(), StepError> {
    match &store_context.inspection {
        Some(Outcome::Failure(err)) if error_kind(err) == kind => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected {kind} failure, got {other:?}"
        ))),
    }
}
