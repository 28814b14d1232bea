//! `all`, `race`, `any`, `all_settled` through the runtime facade, plus the
//! dynamic variants.

#[macro_use]
mod common;

use common::*;
use pledge::combinator::dynamic;
use pledge::{Deferred, Reason, Resolution, Runtime, Settlement};
use serde_json::json;

#[test]
fn all_fulfils_in_order_or_rejects_with_first_reason() {
    init_test("all_fulfils_in_order_or_rejects_with_first_reason");
    let rt = Runtime::new();

    let ok: Deferred<Vec<i32>, Reason> = rt.all([rt.resolve(1), rt.resolve(2), rt.resolve(3)]);
    let settlement = settle(&rt, &ok);
    assert_with_log!(
        settlement == Settlement::fulfilled(vec![1, 2, 3]),
        "all values",
        "[1, 2, 3]",
        settlement
    );

    let failed: Deferred<Vec<i32>, Reason> =
        rt.all([rt.resolve(1), rt.reject(Reason::msg("x")), rt.resolve(2)]);
    let settlement = settle(&rt, &failed);
    assert_with_log!(
        settlement == Settlement::rejected(Reason::msg("x")),
        "first rejection",
        "Rejected(x)",
        settlement
    );

    let empty: Deferred<Vec<i32>, Reason> = rt.all(Vec::<i32>::new());
    let settlement = settle(&rt, &empty);
    assert_with_log!(
        settlement == Settlement::fulfilled(Vec::new()),
        "empty input",
        "[]",
        settlement
    );
    test_complete!("all_fulfils_in_order_or_rejects_with_first_reason");
}

#[test]
fn race_takes_the_earlier_settlement() {
    init_test("race_takes_the_earlier_settlement");
    let rt = Runtime::new();
    let (early, early_resolver) = rt.with_resolvers::<&'static str, Reason>();
    let (late, late_resolver) = rt.with_resolvers::<&'static str, Reason>();
    let winner: Deferred<&'static str, Reason> = rt.race([late, early]);

    early_resolver.reject(Reason::msg("early"));
    rt.run_until_idle().expect("drain");
    late_resolver.resolve("late");
    let settlement = settle(&rt, &winner);
    assert_with_log!(
        settlement == Settlement::rejected(Reason::msg("early")),
        "later settlement ignored",
        "Rejected(early)",
        settlement
    );
    test_complete!("race_takes_the_earlier_settlement");
}

#[test]
fn any_aggregates_or_takes_first_fulfilment() {
    init_test("any_aggregates_or_takes_first_fulfilment");
    let rt = Runtime::new();

    let none: Deferred<&'static str, Reason> = rt.any([
        rt.reject(Reason::msg("1")),
        rt.reject(Reason::msg("2")),
        rt.reject(Reason::msg("3")),
    ]);
    let settlement = settle(&rt, &none);
    let aggregate = settlement.reason().and_then(Reason::as_aggregate).cloned();
    assert_with_log!(
        aggregate.as_ref().map(|a| a.errors().to_vec())
            == Some(vec![Reason::msg("1"), Reason::msg("2"), Reason::msg("3")]),
        "all reasons collected",
        "[1, 2, 3]",
        aggregate
    );
    assert_with_log!(
        settlement
            .reason()
            .is_some_and(|r| r.to_string().starts_with(pledge::error::ALL_REJECTED_MESSAGE)),
        "aggregate message",
        pledge::error::ALL_REJECTED_MESSAGE,
        settlement.reason()
    );

    let some: Deferred<&'static str, Reason> = rt.any([
        rt.reject(Reason::msg("1")),
        rt.resolve("ok"),
        rt.reject(Reason::msg("3")),
    ]);
    let settlement = settle(&rt, &some);
    assert_with_log!(
        settlement == Settlement::fulfilled("ok"),
        "first fulfilment",
        "Fulfilled(ok)",
        settlement
    );
    test_complete!("any_aggregates_or_takes_first_fulfilment");
}

#[test]
fn all_settled_reports_every_outcome() {
    init_test("all_settled_reports_every_outcome");
    let rt = Runtime::new();
    let report: Deferred<Vec<Settlement<i32, i32>>, i32> = rt.all_settled([
        Resolution::Value(1),
        Resolution::Deferred(rt.reject(2)),
    ]);
    let settlement = settle(&rt, &report);
    let records = settlement.value().cloned().unwrap_or_default();
    assert_with_log!(
        records == vec![Settlement::fulfilled(1), Settlement::rejected(2)],
        "fulfilled then rejected",
        "[fulfilled 1, rejected 2]",
        records
    );
    let wire = serde_json::to_value(&records).expect("serialize");
    assert_with_log!(
        wire == json!([
            {"status": "fulfilled", "value": 1},
            {"status": "rejected", "reason": 2}
        ]),
        "status records",
        r#"[{"status":"fulfilled","value":1},{"status":"rejected","reason":2}]"#,
        wire
    );
    test_complete!("all_settled_reports_every_outcome");
}

#[test]
fn dynamic_input_must_be_iterable() {
    init_test("dynamic_input_must_be_iterable");
    let rt = Runtime::new();
    let handle = rt.handle();

    let rejected = dynamic::all(&handle, &json!(42));
    let settlement = settle(&rt, &rejected);
    assert_with_log!(
        settlement.reason().map(ToString::to_string).as_deref() == Some("number is not iterable"),
        "type error message",
        "number is not iterable",
        settlement
    );
    assert_with_log!(
        settlement.reason().and_then(Reason::as_type_error).is_some(),
        "type error variant",
        true,
        settlement
    );

    let chars = dynamic::all_settled(&handle, &json!("ab"));
    let settlement = settle(&rt, &chars);
    assert_with_log!(
        settlement
            == Settlement::fulfilled(vec![
                Settlement::fulfilled(json!("a")),
                Settlement::fulfilled(json!("b")),
            ]),
        "strings iterate characters",
        "[a, b]",
        settlement
    );
    test_complete!("dynamic_input_must_be_iterable");
}
