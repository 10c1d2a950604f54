use floorplan::counter::{session_visit, CounterStore};
use floorplan_wasm::LocalStorageStore;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "floorplan-test-visits";

#[wasm_bindgen_test]
fn local_storage_counts_and_resets() {
    let mut s = LocalStorageStore::open().unwrap();
    s.reset(KEY).unwrap();
    assert_eq!(s.get(KEY).unwrap(), 0);
    assert_eq!(s.increment(KEY).unwrap(), 1);
    assert_eq!(s.increment(KEY).unwrap(), 2);
    let again = LocalStorageStore::open().unwrap();
    assert_eq!(again.get(KEY).unwrap(), 2, "value persists across handles");
    s.reset(KEY).unwrap();
}

#[wasm_bindgen_test]
fn counted_sessions_only_read() {
    let mut s = LocalStorageStore::open().unwrap();
    s.reset(KEY).unwrap();
    let first = session_visit(&mut s, KEY, false).unwrap();
    assert!(first.counted);
    let second = session_visit(&mut s, KEY, true).unwrap();
    assert_eq!((second.visits, second.counted), (1, false));
    s.reset(KEY).unwrap();
}

#[wasm_bindgen_test]
fn garbage_in_storage_reads_as_zero() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.set_item(KEY, "not a number").unwrap();
    let mut s = LocalStorageStore::open().unwrap();
    assert_eq!(s.get(KEY).unwrap(), 0);
    assert_eq!(s.increment(KEY).unwrap(), 1);
    s.reset(KEY).unwrap();
}
