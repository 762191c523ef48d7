//! BDD scenarios for listing and inspection.

use rstest_bdd_macros::scenario;

use super::test_helpers::{StoreContext, store_context};

#[scenario(
    path = "tests/features/store.feature",
    name = "List a single volume with its backups"
)]
fn scenario_list_single_volume(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "List every volume in the store"
)]
fn scenario_list_all_volumes(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "Reject the listing when a volume belongs to another driver"
)]
fn scenario_driver_mismatch(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "Discard the listing when a backup cannot be read"
)]
fn scenario_unreadable_backup(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "Reject invalid volume names"
)]
fn scenario_invalid_name(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "Inspect a backup by its URL"
)]
fn scenario_inspect_backup(store_context: StoreContext) {
    let _ = store_context;
}

#[scenario(
    path = "tests/features/store.feature",
    name = "Inspect a backup that does not exist"
)]
fn scenario_inspect_missing_backup(store_context: StoreContext) {
    let _ = store_context;
}
