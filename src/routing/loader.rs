//! Deferred view producers.
//!
//! # Responsibilities
//! - Define the `ViewLoader` capability (zero-argument async producer)
//! - Adapt closures into loaders
//! - Fetch view sources from disk on demand
//! - Map component keys from configuration onto loaders
//!
//! # Design Decisions
//! - Loaders return `'static` futures so a fetch can outlive its requester
//! - Loaders are idempotent-safe; caching lives in the resolver, not here

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use crate::error::LoadError;

/// A loaded view implementation, ready to hand to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    component: String,
    source: Arc<str>,
}

impl View {
    pub fn new(component: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        Self {
            component: component.into(),
            source: source.into(),
        }
    }

    /// Component key this view was loaded for.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Raw view source as fetched.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Asynchronous producer of a single view.
pub trait ViewLoader: Send + Sync + fmt::Debug {
    /// Start fetching the view. May be called more than once.
    fn load(&self) -> BoxFuture<'static, Result<View, LoadError>>;
}

/// Loader backed by a closure.
pub struct FnLoader<F> {
    label: String,
    f: F,
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader").field("label", &self.label).finish()
    }
}

impl<F, Fut> ViewLoader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<View, LoadError>> + Send + 'static,
{
    fn load(&self) -> BoxFuture<'static, Result<View, LoadError>> {
        (self.f)().boxed()
    }
}

/// Wrap a closure as a shared loader.
pub fn loader_fn<F, Fut>(label: impl Into<String>, f: F) -> Arc<dyn ViewLoader>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<View, LoadError>> + Send + 'static,
{
    Arc::new(FnLoader {
        label: label.into(),
        f,
    })
}

/// Reads a view's source from disk each time it is invoked.
#[derive(Debug, Clone)]
pub struct FileLoader {
    component: String,
    path: PathBuf,
}

impl FileLoader {
    pub fn new(component: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            component: component.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewLoader for FileLoader {
    fn load(&self) -> BoxFuture<'static, Result<View, LoadError>> {
        let component = self.component.clone();
        let path = self.path.clone();
        async move {
            tracing::debug!(component = %component, path = ?path, "Fetching view source");
            let source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| LoadError::new(format!("{}: {}", path.display(), e)))?;
            Ok(View::new(component, source))
        }
        .boxed()
    }
}

/// Maps component keys (as written in the route configuration) to loaders.
///
/// Explicit registrations win; otherwise a directory-backed catalog resolves
/// `<dir>/<key>.<extension>` to a [`FileLoader`] if that file exists.
#[derive(Debug, Default, Clone)]
pub struct ViewCatalog {
    loaders: HashMap<String, Arc<dyn ViewLoader>>,
    directory: Option<(PathBuf, String)>,
}

impl ViewCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog serving view sources from a directory.
    pub fn with_directory(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            loaders: HashMap::new(),
            directory: Some((dir.into(), extension.into())),
        }
    }

    /// Register an explicit loader for a component key.
    pub fn register(&mut self, component: impl Into<String>, loader: Arc<dyn ViewLoader>) {
        self.loaders.insert(component.into(), loader);
    }

    /// Look up the loader for a component key without fetching anything.
    pub fn loader_for(&self, component: &str) -> Option<Arc<dyn ViewLoader>> {
        if let Some(loader) = self.loaders.get(component) {
            return Some(Arc::clone(loader));
        }

        let (dir, extension) = self.directory.as_ref()?;
        let path = dir.join(format!("{}.{}", component, extension));
        if path.is_file() {
            Some(Arc::new(FileLoader::new(component, path)))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fn_loader_invokes_closure_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let loader = loader_fn("load", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(View::new("load", "<template>load</template>")) }
        });

        let view = loader.load().await.unwrap();
        assert_eq!(view.component(), "load");
        loader.load().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_file_loader_reads_source() {
        let dir = std::env::temp_dir().join(format!("route-resolver-loader-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("blockly.vue"), "<template>blockly</template>").unwrap();

        let catalog = ViewCatalog::with_directory(&dir, "vue");
        let loader = catalog.loader_for("blockly").expect("file-backed loader");
        let view = loader.load().await.unwrap();
        assert_eq!(view.source(), "<template>blockly</template>");

        assert!(catalog.loader_for("missing").is_none());

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_file_loader_missing_file_is_load_error() {
        let loader = FileLoader::new("gone", "/nonexistent/route-resolver/gone.vue");
        let err = loader.load().await.unwrap_err();
        assert!(err.to_string().contains("gone.vue"));
    }

    #[test]
    fn test_explicit_registration_wins() {
        let mut catalog = ViewCatalog::with_directory("/nonexistent", "vue");
        catalog.register("load", loader_fn("load", || async { Ok(View::new("load", "")) }));
        assert!(catalog.loader_for("load").is_some());
        assert!(catalog.loader_for("drag").is_none());
    }
}
