use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use parking_lot::Mutex;
use vessel::prelude::*;
use vessel::rendering::render_chain;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("vessel_container=trace")
        .with_test_writer()
        .try_init();
}

struct Logger;

struct App {
    logger: Arc<Logger>,
    host: Arc<String>,
}

fn bootstrap() -> Container {
    let mut container = Container::new();
    container
        .register("db.host", Binding::parameter(String::from("localhost")))
        .unwrap();
    container
        .register("Logger", Service::new(|_| Ok(Logger)).tag("core"))
        .unwrap();
    container
        .register(
            "App",
            Service::new(|args| {
                Ok(App {
                    logger: args.get(0)?,
                    host: args.get(1)?,
                })
            })
            .depends_on(["Logger", "db.host"]),
        )
        .unwrap();
    container
}

#[test]
fn bootstrap_then_fetch() {
    init_tracing();
    let container = bootstrap();
    tracing::info!("bootstrapped");

    let app: Arc<App> = container.fetch_as("App").unwrap();
    let again: Arc<App> = container.fetch_as("App").unwrap();

    assert_eq!(app.host.as_str(), "localhost");
    assert!(Arc::ptr_eq(&app, &again));
    assert!(Arc::ptr_eq(&app.logger, &again.logger));

    let core = container.tagged_services("core");
    assert_eq!(core.len(), 1);
    assert_eq!(core[0].name(), "Logger");
    assert!(core[0].is_shared());
    assert!(core[0].produces().ends_with("Logger"));
}

#[test]
fn registration_interleaves_with_fetching() {
    init_tracing();
    let mut container = bootstrap();
    container.fetch("App").unwrap();

    container
        .register_service(
            "Report",
            Service::new(|args| Ok(format!("app on {}", args.get::<App>(0)?.host)))
                .depends_on(["App"]),
        )
        .unwrap();

    let report: Arc<String> = container.fetch_as("Report").unwrap();
    assert_eq!(report.as_str(), "app on localhost");
}

#[test]
fn cycle_surfaces_as_error() {
    init_tracing();
    let mut container = Container::new();
    container
        .register("A", Service::new(|_| Ok(())).depends_on(["B"]))
        .unwrap();
    container
        .register("B", Service::new(|_| Ok(())).depends_on(["A"]))
        .unwrap();

    let err = container.fetch("A").unwrap_err();
    match &err {
        ContainerError::CyclicDependency(e) => assert_eq!(render_chain(&e.chain), "A → B → A"),
        other => panic!("Expected CyclicDependency, got: {other:?}"),
    }
    assert!(err.to_string().contains("A → B → A"));

    match container.validate().unwrap_err() {
        ContainerError::CyclicDependency(e) => assert_eq!(e.chain, ["A", "B", "A"]),
        other => panic!("Expected CyclicDependency, got: {other:?}"),
    }
}

#[test]
fn externally_synchronized_across_threads() {
    init_tracing();
    let builds = Arc::new(AtomicU32::new(0));
    let mut container = Container::new();
    container
        .register_service("Counter", {
            let builds = builds.clone();
            Service::new(move |_| Ok(builds.fetch_add(1, Ordering::SeqCst)))
        })
        .unwrap();

    let shared = Arc::new(Mutex::new(container));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || shared.lock().fetch_as::<u32>("Counter").unwrap())
        })
        .collect();

    let values: Vec<Arc<u32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}
