//! Property tests for single settlement and ordering.

#[macro_use]
mod common;

use common::*;
use parking_lot::Mutex;
use pledge::{Deferred, Runtime, Settlement};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum SettleCall {
    Resolve(i32),
    Reject(i32),
}

fn arb_call() -> impl Strategy<Value = SettleCall> {
    prop_oneof![
        any::<i32>().prop_map(SettleCall::Resolve),
        any::<i32>().prop_map(SettleCall::Reject),
    ]
}

fn expected(call: &SettleCall) -> Settlement<i32, i32> {
    match call {
        SettleCall::Resolve(value) => Settlement::fulfilled(*value),
        SettleCall::Reject(reason) => Settlement::rejected(*reason),
    }
}

proptest! {
    #[test]
    fn first_settle_call_wins(calls in prop::collection::vec(arb_call(), 1..12)) {
        init_test_logging();
        let rt = Runtime::new();
        let (deferred, resolver) = rt.with_resolvers::<i32, i32>();
        for call in &calls {
            match call {
                SettleCall::Resolve(value) => resolver.resolve(*value),
                SettleCall::Reject(reason) => resolver.reject(*reason),
            }
        }
        rt.run_until_idle().expect("drain");
        prop_assert_eq!(deferred.peek(), Some(expected(&calls[0])));
    }

    #[test]
    fn reactions_run_in_attachment_order(
        before in 0usize..8,
        after in 0usize..8,
        reject in any::<bool>(),
    ) {
        init_test_logging();
        let rt = Runtime::new();
        let (deferred, resolver) = rt.with_resolvers::<i32, i32>();
        let log = Arc::new(Mutex::new(Vec::new()));
        let attach = |tag: usize| {
            let on_value = Arc::clone(&log);
            let on_reason = Arc::clone(&log);
            let _child: Deferred<i32, i32> = deferred.then(
                move |v| {
                    on_value.lock().push(tag);
                    Ok(v)
                },
                move |e| {
                    on_reason.lock().push(tag);
                    Err(e)
                },
            );
        };

        for tag in 0..before {
            attach(tag);
        }
        if reject {
            resolver.reject(1);
        } else {
            resolver.resolve(1);
        }
        for tag in before..before + after {
            attach(tag);
        }
        prop_assert!(log.lock().is_empty());

        rt.run_until_idle().expect("drain");
        let seen = log.lock().clone();
        prop_assert_eq!(seen, (0..before + after).collect::<Vec<_>>());
    }

    #[test]
    fn all_preserves_input_order(order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle()) {
        init_test_logging();
        let rt = Runtime::new();
        let pairs: Vec<_> = (0..order.len())
            .map(|_| rt.with_resolvers::<usize, i32>())
            .collect();
        let joined: Deferred<Vec<usize>, i32> =
            rt.all(pairs.iter().map(|(deferred, _)| deferred.clone()));
        for &index in &order {
            pairs[index].1.resolve(index);
            rt.run_until_idle().expect("drain");
        }
        prop_assert_eq!(joined.peek(), Some(Settlement::fulfilled((0..6).collect())));
    }
}
