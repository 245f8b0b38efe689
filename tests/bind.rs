//! Call-site injection through `Injector::bind`.

use std::sync::Arc;

use curare::{Construct, DeliveryError, Injector};

struct Counter(u32);
impl Construct for Counter {
    type Deps = ();
    fn construct(_: ()) -> Self {
        Counter(40)
    }
}

fn add_with_counter(a: u32, b: u32, counter: Arc<Counter>) -> u32 {
    a + b + counter.0
}

#[test]
fn caller_arguments_are_applied_before_resolved_dependencies() {
    let mut injector = Injector::new();
    injector.prepare::<Counter>();

    let bound = injector.bind::<(u32, u32), _, _>(add_with_counter);
    assert_eq!(bound.call((1, 1)).unwrap(), 42);
    // The binding stays callable; dependencies are resolved per call.
    assert_eq!(bound.call((0, 2)).unwrap(), 42);
}

#[test]
fn targets_without_caller_arguments_bind_too() {
    let mut injector = Injector::new();
    injector.prepare::<Counter>();

    let bound = injector.bind::<(), _, _>(|counter: Arc<Counter>| counter.0);
    assert_eq!(bound.call(()).unwrap(), 40);
}

#[test]
fn strict_binding_fails_on_unprepared_tokens() {
    let injector = Injector::new();
    let bound = injector.bind::<(), _, _>(|counter: Arc<Counter>| counter.0);

    assert!(matches!(
        bound.call(()).unwrap_err(),
        DeliveryError::NotPrepared { .. }
    ));
}

#[test]
fn lenient_binding_passes_absent_dependencies_as_none() {
    let injector = Injector::new();
    let bound =
        injector.bind_lenient::<(), _, _>(|counter: Option<Arc<Counter>>| counter.is_some());

    assert!(!bound.call(()).unwrap());
}

#[test]
fn lenient_binding_still_fails_for_required_dependencies() {
    let injector = Injector::new();
    let bound = injector.bind_lenient::<(), _, _>(|counter: Arc<Counter>| counter.0);

    assert!(matches!(
        bound.call(()).unwrap_err(),
        DeliveryError::Absent { .. }
    ));
}

async fn async_add(tag: u32, counter: Arc<Counter>) -> u32 {
    tag + counter.0
}

#[test]
fn async_targets_return_their_future_transparently() {
    let mut injector = Injector::new();
    injector.prepare::<Counter>();

    let bound = injector.bind::<(u32,), _, _>(async_add);
    // Dependency resolution happens synchronously inside `call`; the target's
    // future is handed back to be awaited by the caller.
    let future = bound.call((2,)).unwrap();
    assert_eq!(futures::executor::block_on(future), 42);
}

#[test]
fn bound_dependencies_observe_scope_branches() {
    let mut parent = Injector::new();
    parent.prepare_value(Counter(1));

    let mut child = parent.branch();
    child.prepare_value(Counter(2));

    let parent_bound = parent.bind::<(), _, _>(|counter: Arc<Counter>| counter.0);
    let child_bound = child.bind::<(), _, _>(|counter: Arc<Counter>| counter.0);

    assert_eq!(parent_bound.call(()).unwrap(), 1);
    assert_eq!(child_bound.call(()).unwrap(), 2);
}
