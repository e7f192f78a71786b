//! File-backed profiles: reloads, storage hygiene and damaged data.

#![allow(clippy::unwrap_used)]

use breeze_core::ProductId;
use breeze_integration_tests::{TestProfile, product};
use breeze_storefront::storage::{ClientStorage, FileStorage};
use breeze_storefront::store::{Cart, Compare, Favorites};
use serde_json::Value;

/// Parse the envelope stored under `key` in the profile document.
fn envelope(profile: &TestProfile, key: &str) -> Value {
    let document = profile.document().unwrap();
    serde_json::from_str(document[key].as_str().unwrap()).unwrap()
}

#[test]
fn test_reload_restores_every_list() {
    let profile = TestProfile::new();
    {
        let session = profile.session();
        session.cart().add(&product("split-18k", 2350, Some(2)), 2);
        session.cart().add(&product("filter", 45, None), 3);
        session.compare().add(&product("split-18k", 2350, Some(2)));
        session.favorites().add(&product("window-12k", 1199, None));
    }

    let first = profile.session();
    let second = profile.session();
    assert_eq!(first.cart().entries(), second.cart().entries());
    assert_eq!(first.cart().total_items(), 5);
    assert_eq!(first.compare().products().len(), 1);
    assert!(first.favorites().contains(&ProductId::new("window-12k")));
}

#[test]
fn test_envelope_layout() {
    let profile = TestProfile::new();
    let session = profile.session();
    session.cart().add(&product("A", 100, Some(2)), 1);

    let stored = envelope(&profile, Cart::STORAGE_KEY);
    assert_eq!(stored["version"], 1);
    assert_eq!(stored["items"][0]["quantity"], 1);
    assert_eq!(stored["items"][0]["product"]["id"], "A");
    assert_eq!(stored["items"][0]["product"]["inventory"], 2);
}

#[test]
fn test_empty_lists_leave_no_keys() {
    let profile = TestProfile::new();
    let session = profile.session();
    let a = product("A", 1, None);

    session.cart().add(&a, 1);
    session.compare().add(&a);
    session.favorites().add(&a);
    session.cart().remove(&a.id);
    session.compare().remove(&a.id);
    session.favorites().remove(&a.id);

    let document = profile.document().unwrap();
    assert_eq!(document, serde_json::json!({}));
}

#[test]
fn test_legacy_array_is_upgraded() {
    let profile = TestProfile::new();
    let storage = profile.storage();
    storage
        .set(
            Favorites::STORAGE_KEY,
            r#"[{"id":"split-18k","name_en":"Split"},{"id":"split-18k"},{"id":"filter"}]"#,
        )
        .unwrap();

    let session = profile.session();
    let favorites = session.favorites().products();
    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0].name_en, "Split");

    let stored = envelope(&profile, Favorites::STORAGE_KEY);
    assert_eq!(stored["version"], 1);
    assert_eq!(stored["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_damaged_values_hydrate_empty() {
    let profile = TestProfile::new();
    let storage = profile.storage();
    storage.set(Cart::STORAGE_KEY, "{not json").unwrap();
    storage
        .set(Compare::STORAGE_KEY, r#"{"version":99,"items":[]}"#)
        .unwrap();
    storage
        .set(Favorites::STORAGE_KEY, r#"{"id":"a"}"#)
        .unwrap();

    let session = profile.session();
    assert!(session.cart().is_empty());
    assert!(session.compare().is_empty());
    assert!(session.favorites().is_empty());

    // Unusable values are removed
    assert_eq!(profile.document().unwrap(), serde_json::json!({}));

    // The session keeps working
    session.cart().add(&product("A", 5, None), 1);
    assert_eq!(profile.session().cart().len(), 1);
}

#[test]
fn test_corrupt_profile_file_reads_as_empty() {
    let profile = TestProfile::new();
    std::fs::write(profile.dir().join(FileStorage::FILE_NAME), "\u{0}garbage").unwrap();

    let session = profile.session();
    assert!(session.cart().is_empty());

    session.favorites().add(&product("A", 5, None));
    assert_eq!(profile.session().favorites().len(), 1);
}

#[test]
fn test_sessions_do_not_sync_until_reload() {
    let profile = TestProfile::new();
    let tab_one = profile.session();
    let tab_two = profile.session();

    tab_one.cart().add(&product("A", 10, None), 1);
    assert!(tab_two.cart().is_empty());

    let reloaded = profile.session();
    assert_eq!(reloaded.cart().len(), 1);
}

#[test]
fn test_sessions_on_one_profile_keep_each_others_lists() {
    let profile = TestProfile::new();
    let tab_one = profile.session();
    let tab_two = profile.session();

    tab_two.favorites().add(&product("window-12k", 1199, None));
    tab_one.cart().add(&product("split-18k", 2350, Some(2)), 1);

    let reloaded = profile.session();
    assert_eq!(reloaded.cart().len(), 1);
    assert!(reloaded.favorites().contains(&ProductId::new("window-12k")));
}
