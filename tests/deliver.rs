//! Behavior of the prepare/deliver surface across injection kinds.

use std::sync::Arc;

use curare::{Construct, DeliveryError, Injector};

#[derive(Debug)]
struct MyService;
impl Construct for MyService {
    type Deps = ();
    fn construct(_: ()) -> Self {
        MyService
    }
}

#[test]
fn value_delivery_returns_the_identical_instance() {
    let mut injector = Injector::new();
    injector.prepare_value(MyService);

    let first = injector.deliver::<MyService>().unwrap();
    let second = injector.deliver::<MyService>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn shared_arc_delivery_keeps_the_callers_allocation() {
    let singleton = Arc::new(MyService);
    let mut injector = Injector::new();
    injector.prepare_arc(Arc::clone(&singleton));

    let delivered = injector.deliver::<MyService>().unwrap();
    assert!(Arc::ptr_eq(&singleton, &delivered));
}

#[test]
fn lambda_delivery_invokes_the_factory_each_time() {
    let mut injector = Injector::new();
    injector.prepare_lambda(|| MyService);

    let first = injector.deliver::<MyService>().unwrap();
    let second = injector.deliver::<MyService>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn lambda_may_deliver_an_empty_result() {
    let mut injector = Injector::new();
    injector.prepare_lambda(|| Option::<u32>::None);

    let delivered = injector.deliver::<Option<u32>>().unwrap();
    assert!(delivered.is_none());
}

#[test]
fn class_delivery_constructs_a_fresh_instance_each_time() {
    let mut injector = Injector::new();
    injector.prepare::<MyService>();

    let first = injector.deliver::<MyService>().unwrap();
    let second = injector.deliver::<MyService>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[derive(Debug)]
struct MyFacade {
    service: Arc<MyService>,
}
impl Construct for MyFacade {
    type Deps = (Arc<MyService>,);
    fn construct((service,): Self::Deps) -> Self {
        MyFacade { service }
    }
}

#[test]
fn class_delivery_resolves_one_dependency() {
    let mut injector = Injector::new();
    injector.prepare::<MyService>();
    injector.prepare::<MyFacade>();

    let facade = injector.deliver::<MyFacade>().unwrap();
    let again = injector.deliver::<MyFacade>().unwrap();
    assert!(!Arc::ptr_eq(&facade.service, &again.service));
}

struct First(u32);
impl Construct for First {
    type Deps = ();
    fn construct(_: ()) -> Self {
        First(1)
    }
}

struct Second(u32);
impl Construct for Second {
    type Deps = ();
    fn construct(_: ()) -> Self {
        Second(2)
    }
}

struct Ordered {
    first: u32,
    second: u32,
}
impl Construct for Ordered {
    type Deps = (Arc<First>, Arc<Second>);
    fn construct((first, second): Self::Deps) -> Self {
        Ordered {
            first: first.0,
            second: second.0,
        }
    }
}

#[test]
fn ingredients_arrive_in_declaration_order() {
    let mut injector = Injector::new();
    injector.prepare::<First>();
    injector.prepare::<Second>();
    injector.prepare::<Ordered>();

    let ordered = injector.deliver::<Ordered>().unwrap();
    assert_eq!(ordered.first, 1);
    assert_eq!(ordered.second, 2);
}

#[derive(Debug)]
struct Repository;
impl Construct for Repository {
    type Deps = ();
    fn construct(_: ()) -> Self {
        Repository
    }
}

struct Service {
    repository: Arc<Repository>,
}
impl Construct for Service {
    type Deps = (Arc<Repository>,);
    fn construct((repository,): Self::Deps) -> Self {
        Service { repository }
    }
}

struct Adapter {
    service: Arc<Service>,
}
impl Construct for Adapter {
    type Deps = (Arc<Service>,);
    fn construct((service,): Self::Deps) -> Self {
        Adapter { service }
    }
}

struct Facade {
    service: Arc<Service>,
    adapter: Arc<Adapter>,
}
impl Construct for Facade {
    type Deps = (Arc<Service>, Arc<Adapter>);
    fn construct((service, adapter): Self::Deps) -> Self {
        Facade { service, adapter }
    }
}

#[test]
fn deep_dependencies_are_constructed_per_consumer() {
    let mut injector = Injector::new();
    injector.prepare::<Facade>();
    injector.prepare::<Service>();
    injector.prepare::<Repository>();
    injector.prepare::<Adapter>();

    let facade = injector.deliver::<Facade>().unwrap();
    // Sibling branches never share: the facade's service and the adapter's
    // service are independent constructions, transitively.
    assert!(!Arc::ptr_eq(&facade.service, &facade.adapter.service));
    assert!(!Arc::ptr_eq(
        &facade.service.repository,
        &facade.adapter.service.repository
    ));
}

#[test]
fn shared_value_is_the_only_sharing_mechanism() {
    let mut injector = Injector::new();
    injector.prepare_value(Repository);
    injector.prepare::<Service>();
    injector.prepare::<Adapter>();
    injector.prepare::<Facade>();

    let facade = injector.deliver::<Facade>().unwrap();
    assert!(Arc::ptr_eq(
        &facade.service.repository,
        &facade.adapter.service.repository
    ));
}

trait PaymentPort: Send + Sync {
    fn name(&self) -> &'static str;
}

struct StripeAdapter;
impl PaymentPort for StripeAdapter {
    fn name(&self) -> &'static str {
        "stripe"
    }
}
impl Construct for StripeAdapter {
    type Deps = ();
    fn construct(_: ()) -> Self {
        StripeAdapter
    }
}
impl From<StripeAdapter> for Box<dyn PaymentPort> {
    fn from(adapter: StripeAdapter) -> Self {
        Box::new(adapter)
    }
}

#[test]
fn concrete_class_can_be_registered_under_another_token() {
    let mut injector = Injector::new();
    injector.prepare_class::<Box<dyn PaymentPort>, StripeAdapter>();

    let port = injector.deliver::<Box<dyn PaymentPort>>().unwrap();
    assert_eq!(port.name(), "stripe");
}

struct CountingFactory {
    label: &'static str,
}
impl CountingFactory {
    fn create(&self, service: Arc<MyService>) -> MyFacade {
        let _ = self.label;
        MyFacade { service }
    }
}

#[test]
fn function_factory_resolves_declared_parameters() {
    let mut injector = Injector::new();
    injector.prepare::<MyService>();
    injector.prepare_factory(|service: Arc<MyService>| MyFacade { service });

    let facade = injector.deliver::<MyFacade>().unwrap();
    let _ = &facade.service;
}

#[test]
fn bound_method_style_factories_work() {
    let factory = CountingFactory { label: "app" };

    let mut injector = Injector::new();
    injector.prepare::<MyService>();
    injector.prepare_factory(move |service: Arc<MyService>| factory.create(service));

    let facade = injector.deliver::<MyFacade>().unwrap();
    let _ = &facade.service;
}

#[test]
fn strict_delivery_fails_on_a_missing_transitive_token() {
    let mut injector = Injector::new();
    injector.prepare::<MyFacade>();

    let error = injector.deliver::<MyFacade>().unwrap_err();
    assert!(matches!(error, DeliveryError::NotPrepared { .. }));
}

#[test]
fn lenient_delivery_substitutes_absent_values() {
    #[derive(Debug)]
    struct Standalone;

    let injector = Injector::new();
    assert!(matches!(
        injector.deliver::<Standalone>().unwrap_err(),
        DeliveryError::NotPrepared { .. }
    ));
    assert!(injector.deliver_opt::<Standalone>().unwrap().is_none());
}

#[derive(Debug)]
struct Optionalist {
    missing: Option<Arc<Repository>>,
}
impl Construct for Optionalist {
    type Deps = (Option<Arc<Repository>>,);
    fn construct((missing,): Self::Deps) -> Self {
        Optionalist { missing }
    }
}

#[test]
fn lenient_delivery_passes_none_into_optional_ingredients() {
    let mut injector = Injector::new();
    injector.prepare::<Optionalist>();

    // Strict mode still insists the ingredient token is prepared.
    assert!(matches!(
        injector.deliver::<Optionalist>().unwrap_err(),
        DeliveryError::NotPrepared { .. }
    ));

    let delivered = injector.deliver_opt::<Optionalist>().unwrap().unwrap();
    assert!(delivered.missing.is_none());
}

#[test]
fn branched_scopes_do_not_leak_into_each_other() {
    let mut parent = Injector::new();
    parent.prepare_value(String::from("alice"));

    let mut child = parent.branch();
    child.prepare_value(String::from("boris"));

    assert_eq!(*parent.deliver::<String>().unwrap(), "alice");
    assert_eq!(*child.deliver::<String>().unwrap(), "boris");
}

#[test]
fn cached_plans_survive_re_preparation() {
    let mut injector = Injector::new();
    injector.prepare_value(1u32);
    assert_eq!(*injector.deliver::<u32>().unwrap(), 1);

    // Replacing the binding does not invalidate the memoized plan; a branch
    // made afterwards sees the replacement through its empty cache.
    injector.prepare_value(2u32);
    assert_eq!(*injector.deliver::<u32>().unwrap(), 1);
    assert_eq!(*injector.branch().deliver::<u32>().unwrap(), 2);
}

#[test]
fn strict_and_lenient_plans_are_cached_separately() {
    struct Late;

    let mut injector = Injector::new();
    assert!(injector.deliver_opt::<Late>().unwrap().is_none());

    injector.prepare_value(Late);
    // The strict key was never planned, so it sees the new binding...
    assert!(injector.deliver::<Late>().is_ok());
    // ...while the lenient key replays its memoized absent plan.
    assert!(injector.deliver_opt::<Late>().unwrap().is_none());
}

#[test]
fn dependency_cycles_fail_with_the_token_chain() {
    #[derive(Debug)]
    struct Chicken(#[allow(dead_code)] Arc<Egg>);
    #[derive(Debug)]
    struct Egg(#[allow(dead_code)] Arc<Chicken>);

    let mut injector = Injector::new();
    injector.prepare_factory(|egg: Arc<Egg>| Chicken(egg));
    injector.prepare_factory(|chicken: Arc<Chicken>| Egg(chicken));

    let error = injector.deliver::<Chicken>().unwrap_err();
    match error {
        DeliveryError::Cycle { chain } => assert_eq!(chain.len(), 3),
        other => panic!("expected cycle, got {other}"),
    }
}

#[test]
fn lenient_delivery_still_rejects_cycles() {
    #[derive(Debug)]
    struct Ouroboros(#[allow(dead_code)] Arc<Ouroboros>);

    let mut injector = Injector::new();
    injector.prepare_factory(|inner: Arc<Ouroboros>| Ouroboros(inner));

    // A cycle is a wiring error either way; lenient mode only tolerates
    // unprepared tokens.
    let error = injector.deliver_opt::<Ouroboros>().unwrap_err();
    assert!(matches!(error, DeliveryError::Cycle { .. }));
}
