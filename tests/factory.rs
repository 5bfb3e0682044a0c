use di_factory::{
    add_factory, implements, Factory, FactoryErrorKind, Inject, InstantiateErrorKind, Lifetime::*, ProducerFn, ServiceCollection,
    ServiceCollectionExt as _,
};
use std::sync::Arc;

trait TestService: Send + Sync {
    fn do_something(&self) -> String;
}

struct TestServiceA;

impl TestService for TestServiceA {
    fn do_something(&self) -> String {
        "TestServiceA did something".to_owned()
    }
}

struct TestServiceB(Arc<dyn TestService>);

impl TestService for TestServiceB {
    fn do_something(&self) -> String {
        "TestServiceB did something".to_owned()
    }
}

implements!(TestServiceA => dyn TestService);
implements!(TestServiceB => dyn TestService);

#[test]
fn test_transient_factory_creates_distinct_instances() {
    let mut services = ServiceCollection::new();
    add_factory::<dyn TestService, TestServiceA, _, _>(Some(&mut services), Transient, || Ok(TestServiceA)).unwrap();
    let container = services.build();

    let factory = container.get::<Factory<dyn TestService>>().unwrap();
    let service_1 = factory.create().unwrap();
    let service_2 = factory.create().unwrap();

    assert!(!Arc::ptr_eq(&service_1, &service_2));
    assert_eq!(service_1.do_something(), "TestServiceA did something");
    assert_eq!(service_2.do_something(), "TestServiceA did something");
}

#[test]
fn test_factory_injected_into_consumer() {
    struct Consumer(Arc<Factory<TestServiceB>>);

    let mut services = ServiceCollection::new();
    services
        .add_factory::<dyn TestService, TestServiceA, _, _>(Scoped, || Ok(TestServiceA))
        .add_factory_self::<TestServiceB, _, _>(Transient, |Inject(inner): Inject<dyn TestService>| {
            Ok::<_, InstantiateErrorKind>(TestServiceB(inner))
        })
        .add_self::<Consumer, _, _>(Transient, |Inject(factory): Inject<Factory<TestServiceB>>| Ok(Consumer(factory)));
    let container = services.build();

    let scope = container.create_scope();
    let consumer = scope.get::<Consumer>().unwrap();
    let service = consumer.0.create().unwrap();

    assert_eq!(service.do_something(), "TestServiceB did something");
    assert_eq!(service.0.do_something(), "TestServiceA did something");
}

#[test]
fn test_scoped_producer_outside_scope() {
    let mut services = ServiceCollection::new();
    services.add_factory::<dyn TestService, TestServiceA, _, _>(Scoped, || Ok(TestServiceA));
    let container = services.build();

    assert!(container.get::<dyn TestService>().is_err());

    let producer = container.get::<ProducerFn<dyn TestService>>().unwrap();
    assert_eq!(producer().unwrap().do_something(), "TestServiceA did something");
}

#[test]
fn test_dispose_twice() {
    let mut services = ServiceCollection::new();
    services.add_factory::<dyn TestService, TestServiceA, _, _>(Singleton, || Ok(TestServiceA));
    let container = services.build();

    let factories = container.get_all::<Factory<dyn TestService>>().unwrap();
    let factory = &factories[0];
    assert!(factory.create().is_ok());

    factory.dispose();
    let first = factory.create();
    factory.dispose();
    let second = factory.create();

    assert!(matches!(first, Err(FactoryErrorKind::InvalidState)));
    assert!(matches!(second, Err(FactoryErrorKind::InvalidState)));
}

#[test]
fn test_scope_drop_keeps_singleton_factories() {
    let mut services = ServiceCollection::new();
    services.add_factory::<dyn TestService, TestServiceA, _, _>(Transient, || Ok(TestServiceA));
    let container = services.build();

    let scope = container.create_scope();
    let factory = scope.get::<Factory<dyn TestService>>().unwrap();
    drop(scope);

    assert!(!factory.is_disposed());
    assert!(factory.create().is_ok());

    drop(container);
    assert!(factory.is_disposed());
}
