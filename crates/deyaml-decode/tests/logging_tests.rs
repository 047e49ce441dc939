#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use deyaml_core::logging_facility::test_capture::init_test_capture;
use deyaml_core_types::schema::{EVENT_END, EVENT_END_ERROR, FIELD_ERR_CODE, FIELD_OBJECT_COUNT};
use deyaml_decode::Decoder;

#[test]
fn test_decode_emits_end_with_object_count() {
    let capture = init_test_capture();
    let scheme = common::kubernetes();

    Decoder::new(&scheme)
        .decode_str(&common::read_fixture("multi.yaml"))
        .unwrap();

    capture.assert_event_exists("schema_build", EVENT_END);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("decode")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_OBJECT_COUNT) == Some("2")
    });
    assert!(ends >= 1);
}

#[test]
fn test_decode_failure_emits_end_error() {
    let capture = init_test_capture();
    let scheme = common::kubernetes();

    let _ = Decoder::new(&scheme).decode_str("apiVersion: example.com/v9\nkind: Nope\n");

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("decode")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_UNKNOWN_KIND")
    });
    assert!(errors >= 1);
}
