//! Shared loaders and tables for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use route_resolver::error::LoadError;
use route_resolver::routing::{loader_fn, ViewLoader};
use route_resolver::{RouteEntry, RouteTable, View};

/// Loader that counts every fetch and succeeds immediately.
pub fn counting(component: &'static str, calls: Arc<AtomicUsize>) -> Arc<dyn ViewLoader> {
    loader_fn(component, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(View::new(component, format!("<template><{}/></template>", component))) }
    })
}

/// Loader that fails the first `failures` fetches, then succeeds.
pub fn flaky(component: &'static str, failures: usize, calls: Arc<AtomicUsize>) -> Arc<dyn ViewLoader> {
    loader_fn(component, move || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt < failures {
                Err(LoadError::new(format!("chunk {} unavailable", component)))
            } else {
                Ok(View::new(component, ""))
            }
        }
    })
}

/// A fetch that signals when it starts and holds until released.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    pub calls: Arc<AtomicUsize>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loader(&self, component: &'static str) -> Arc<dyn ViewLoader> {
        let gate = self.clone();
        loader_fn(component, move || {
            let gate = gate.clone();
            gate.calls.fetch_add(1, Ordering::SeqCst);
            async move {
                gate.started.notify_one();
                gate.release.notified().await;
                Ok(View::new(component, ""))
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until the gated fetch is running.
    pub async fn wait_started(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.started.notified())
            .await
            .expect("gated load never started");
    }

    pub fn open(&self) {
        self.release.notify_one();
    }
}

/// The shell's route table: `/` forwards to `/load`, everything else is lazy.
pub fn landing_table(calls: Arc<AtomicUsize>) -> RouteTable {
    let mut entries = vec![RouteEntry::redirect("/", "/", "/load")];
    for (path, name, component) in [
        ("/load", "Load", "load"),
        ("/blockly", "blockly", "blockly"),
        ("/drag", "Drag", "drag"),
        ("/load2", "Load2", "load2"),
        ("/load3", "Load3", "load3"),
    ] {
        entries.push(RouteEntry::lazy(path, name, counting(component, calls.clone())));
    }
    RouteTable::new(entries).unwrap()
}

/// Poll `check` until it holds or the deadline passes.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
