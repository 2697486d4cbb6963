//! Resolver behaviour under realistic navigation patterns.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use route_resolver::routing::{NavigationPolicy, NavigationRequest};
use route_resolver::{ConfigurationError, Resolver, RouteEntry, RouteTable, RoutingError};

mod common;

#[tokio::test]
async fn test_landing_scenarios() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = Resolver::new(common::landing_table(calls.clone()));

    let root = resolver.resolve("/").await.unwrap();
    assert_eq!(root.entry.path(), "/load");
    assert_eq!(root.view.component(), "load");
    assert_eq!(root.request.path(), "/");

    let load = resolver.resolve("/load").await.unwrap();
    assert!(Arc::ptr_eq(&root.view, &load.view));

    let blockly = resolver.resolve("/blockly").await.unwrap();
    assert_eq!(blockly.view.component(), "blockly");
    assert_eq!(resolver.current_path().as_deref(), Some("/blockly"));

    let missing = resolver.resolve("/missing").await.unwrap_err();
    assert_eq!(missing, RoutingError::NotFound { path: "/missing".into() });
    assert_eq!(resolver.current_path().as_deref(), Some("/blockly"));

    // "/" and "/load" share one fetch, "/blockly" its own
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_every_lazy_path_resolves_to_its_own_entry() {
    let resolver = Resolver::new(common::landing_table(Arc::default()));
    let lazy: Vec<_> = resolver
        .table()
        .iter()
        .filter(|(_, e)| e.loader().is_some())
        .map(|(id, e)| (id, e.path().to_string()))
        .collect();
    assert_eq!(lazy.len(), 5);

    for (id, path) in lazy {
        let resolved = resolver.resolve(&path).await.unwrap();
        assert_eq!(resolved.entry.path(), path);
        assert_eq!(resolver.table().lookup(&path).map(|(i, _)| i), Some(id));
    }
    assert_eq!(resolver.cached_views(), 5);
}

#[tokio::test]
async fn test_hash_request_resolves_path_part() {
    let resolver = Resolver::new(common::landing_table(Arc::default()));
    let request = NavigationRequest::from_hash("#/drag?level=2");
    let resolved = resolver.resolve_request(request).await.unwrap();
    assert_eq!(resolved.entry.name(), "Drag");
    assert_eq!(resolved.request.query(), Some("level=2"));
}

#[tokio::test]
async fn test_concurrent_resolutions_share_one_fetch() {
    let gate = common::Gate::new();
    let table = RouteTable::new(vec![
        RouteEntry::redirect("/", "/", "/load"),
        RouteEntry::lazy("/load", "Load", gate.loader("load")),
    ])
    .unwrap();
    let resolver = Arc::new(Resolver::new(table));

    // one navigation, several requesters (a retry path joins the same ticket)
    let ticket = resolver.begin();
    let mut handles = Vec::new();
    for path in ["/", "/load", "/", "/load"] {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            resolver.resolve_ticketed(NavigationRequest::new(path), ticket).await
        }));
    }

    gate.wait_started().await;
    tokio::task::yield_now().await;
    gate.open();

    let mut views = Vec::new();
    for handle in handles {
        views.push(handle.await.unwrap().unwrap().view);
    }
    assert!(views.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(gate.calls(), 1);
}

#[tokio::test]
async fn test_failed_load_is_retried_on_next_resolve() {
    let calls = Arc::new(AtomicUsize::new(0));
    let table = RouteTable::new(vec![RouteEntry::lazy(
        "/blockly",
        "blockly",
        common::flaky("blockly", 1, calls.clone()),
    )])
    .unwrap();
    let resolver = Resolver::new(table);

    let err = resolver.resolve("/blockly").await.unwrap_err();
    assert!(matches!(err, RoutingError::LoadFailure { ref path, .. } if path == "/blockly"));
    assert!(!resolver.is_loaded("/blockly"));
    assert_eq!(resolver.current_path(), None);

    resolver.resolve("/blockly").await.unwrap();
    assert!(resolver.is_loaded("/blockly"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_latest_wins_discards_stale_resolution() {
    let gate = common::Gate::new();
    let fast_calls = Arc::new(AtomicUsize::new(0));
    let table = RouteTable::new(vec![
        RouteEntry::lazy("/blockly", "blockly", gate.loader("blockly")),
        RouteEntry::lazy("/drag", "Drag", common::counting("drag", fast_calls)),
    ])
    .unwrap();
    let resolver = Arc::new(Resolver::new(table));

    let slow = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve("/blockly").await })
    };
    gate.wait_started().await;

    let fast = resolver.resolve("/drag").await.unwrap();
    assert_eq!(fast.entry.path(), "/drag");

    gate.open();
    let stale = slow.await.unwrap().unwrap_err();
    assert_eq!(stale, RoutingError::Superseded { path: "/blockly".into() });
    assert_eq!(resolver.current_path().as_deref(), Some("/drag"));

    // the stale fetch still filled the cache
    assert!(resolver.is_loaded("/blockly"));
}

#[tokio::test]
async fn test_sequential_surfaces_every_result_in_order() {
    let gate = common::Gate::new();
    let table = RouteTable::new(vec![
        RouteEntry::lazy("/blockly", "blockly", gate.loader("blockly")),
        RouteEntry::lazy("/drag", "Drag", common::counting("drag", Arc::default())),
    ])
    .unwrap();
    let resolver = Arc::new(Resolver::with_policy(table, NavigationPolicy::Sequential));

    let slow = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve("/blockly").await })
    };
    gate.wait_started().await;

    let fast = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve("/drag").await })
    };
    tokio::task::yield_now().await;
    assert!(!fast.is_finished());

    gate.open();
    assert_eq!(slow.await.unwrap().unwrap().entry.path(), "/blockly");
    assert_eq!(fast.await.unwrap().unwrap().entry.path(), "/drag");
    assert_eq!(resolver.current_path().as_deref(), Some("/drag"));
}

#[tokio::test]
async fn test_load_completes_after_requester_goes_away() {
    let gate = common::Gate::new();
    let table = RouteTable::new(vec![RouteEntry::lazy("/load", "Load", gate.loader("load"))]).unwrap();
    let resolver = Arc::new(Resolver::new(table));

    let requester = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve("/load").await })
    };
    gate.wait_started().await;
    requester.abort();
    assert!(requester.await.unwrap_err().is_cancelled());

    gate.open();
    let watcher = resolver.clone();
    assert!(common::eventually(move || watcher.is_loaded("/load")).await);

    resolver.resolve("/load").await.unwrap();
    assert_eq!(gate.calls(), 1);
}

#[test]
fn test_duplicate_path_rejected_at_registration() {
    let err = RouteTable::new(vec![
        RouteEntry::lazy("/load", "Load", common::counting("load", Arc::default())),
        RouteEntry::lazy("/load", "Load2", common::counting("load2", Arc::default())),
    ])
    .unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicatePath("/load".into()));
}

#[tokio::test]
async fn test_redirect_cycle_is_bounded() {
    let table = RouteTable::new(vec![
        RouteEntry::redirect("/a", "a", "/b"),
        RouteEntry::redirect("/b", "b", "/a"),
    ])
    .unwrap();
    let resolver = Resolver::new(table);

    let err = resolver.resolve("/a").await.unwrap_err();
    assert_eq!(err, RoutingError::RedirectCycle { path: "/a".into(), hops: 2 });
    assert_eq!(resolver.current_path(), None);
}
