//! Fixture provision: named factories resolved and cached per test.
//!
//! Specs never construct page objects by hand. A [`FixtureRegistry`] maps
//! fixture names to factory functions, and each test invocation builds a
//! [`TestContext`] over it: the first reference to a name runs the factory
//! against that invocation's page handle, later references return the same
//! cached instance, and nothing survives into the next context. Adding a
//! page object to the system means registering one more factory; existing
//! fixtures and specs are untouched.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::page::PageHandle;
use crate::result::{NavegarError, NavegarResult};

type BoxedFixture = Arc<dyn Any + Send + Sync>;
type FixtureFactory = Arc<dyn Fn(&PageHandle) -> BoxedFixture + Send + Sync>;

/// Mapping from fixture name to factory function.
#[derive(Clone, Default)]
pub struct FixtureRegistry {
    factories: HashMap<String, FixtureFactory>,
}

impl std::fmt::Debug for FixtureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureRegistry")
            .field("fixture_count", &self.factories.len())
            .finish()
    }
}

impl FixtureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a name.
    ///
    /// If the name is already registered, the factory is replaced.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&PageHandle) -> T + Send + Sync + 'static,
    {
        let _ = self.factories.insert(
            name.into(),
            Arc::new(move |page| Arc::new(factory(page)) as BoxedFixture),
        );
    }

    /// Check if a fixture name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered fixtures.
    #[must_use]
    pub fn count(&self) -> usize {
        self.factories.len()
    }

    /// Names of all registered fixtures.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// Per-test-invocation fixture resolution over one page handle.
///
/// Construct one context per test; fixtures are instantiated at most once
/// per context and never shared across contexts. No teardown is performed
/// here: the engine owns page cleanup.
pub struct TestContext {
    page: PageHandle,
    registry: Arc<FixtureRegistry>,
    instances: HashMap<String, BoxedFixture>,
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("registry", &self.registry)
            .field("instantiated", &self.instances.len())
            .finish()
    }
}

impl TestContext {
    /// Create a context for one test invocation.
    #[must_use]
    pub fn new(page: PageHandle, registry: Arc<FixtureRegistry>) -> Self {
        Self {
            page,
            registry,
            instances: HashMap::new(),
        }
    }

    /// The page handle this context is bound to.
    #[must_use]
    pub const fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Resolve a fixture by name.
    ///
    /// The factory runs on the first reference within this context; later
    /// references return the same instance.
    ///
    /// # Errors
    ///
    /// Returns [`NavegarError::FixtureError`] for unregistered names or when
    /// `T` does not match the registered factory's type.
    pub fn fixture<T: Any + Send + Sync>(&mut self, name: &str) -> NavegarResult<Arc<T>> {
        let cached = match self.instances.entry(name.to_string()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let factory = self.registry.factories.get(name).ok_or_else(|| {
                    NavegarError::FixtureError {
                        message: format!("no fixture registered under '{name}'"),
                    }
                })?;
                tracing::debug!(fixture = name, "instantiating fixture");
                Arc::clone(entry.insert(factory(&self.page)))
            }
        };

        cached
            .downcast::<T>()
            .map_err(|_| NavegarError::FixtureError {
                message: format!(
                    "fixture '{name}' is not a {}",
                    std::any::type_name::<T>()
                ),
            })
    }
}

#[cfg(test)]
#[cfg(not(feature = "browser"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::Page;
    use crate::config::HarnessConfig;

    #[derive(Debug)]
    struct CounterFixture {
        id: u32,
    }

    fn handle() -> PageHandle {
        PageHandle::new(Page::default(), Arc::new(HarnessConfig::default()))
    }

    fn registry_with_counter() -> Arc<FixtureRegistry> {
        use std::sync::atomic::{AtomicU32, Ordering};
        static NEXT_ID: AtomicU32 = AtomicU32::new(0);

        let mut registry = FixtureRegistry::new();
        registry.register("counter", |_page| CounterFixture {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
        });
        Arc::new(registry)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FixtureRegistry::new();
        registry.register("counter", |_page| CounterFixture { id: 0 });

        assert!(registry.is_registered("counter"));
        assert!(!registry.is_registered("other"));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.names(), vec!["counter"]);
    }

    #[test]
    fn test_fixture_is_instantiated_once_per_context() {
        let registry = registry_with_counter();
        let mut ctx = TestContext::new(handle(), registry);

        let first = ctx.fixture::<CounterFixture>("counter").unwrap();
        let second = ctx.fixture::<CounterFixture>("counter").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_fresh_instance_per_context() {
        let registry = registry_with_counter();

        let mut first_ctx = TestContext::new(handle(), registry.clone());
        let mut second_ctx = TestContext::new(handle(), registry);

        let first = first_ctx.fixture::<CounterFixture>("counter").unwrap();
        let second = second_ctx.fixture::<CounterFixture>("counter").unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_unknown_fixture_name() {
        let registry = registry_with_counter();
        let mut ctx = TestContext::new(handle(), registry);

        let result = ctx.fixture::<CounterFixture>("missing");

        match result {
            Err(NavegarError::FixtureError { message }) => {
                assert!(message.contains("missing"));
            }
            other => panic!("expected FixtureError, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let registry = registry_with_counter();
        let mut ctx = TestContext::new(handle(), registry);

        let result = ctx.fixture::<String>("counter");

        assert!(matches!(result, Err(NavegarError::FixtureError { .. })));
    }

    #[test]
    fn test_registration_is_open_closed() {
        let mut registry = FixtureRegistry::new();
        registry.register("counter", |_page| CounterFixture { id: 7 });
        registry.register("greeting", |_page| "hola".to_string());

        let mut ctx = TestContext::new(handle(), Arc::new(registry));

        assert_eq!(ctx.fixture::<CounterFixture>("counter").unwrap().id, 7);
        assert_eq!(*ctx.fixture::<String>("greeting").unwrap(), "hola");
    }

    #[test]
    fn test_factory_receives_the_context_page() {
        let mut registry = FixtureRegistry::new();
        registry.register("url", |page: &PageHandle| page.url());

        let page = handle();
        let mut ctx = TestContext::new(page, Arc::new(registry));

        // Mock pages start on an empty URL
        assert_eq!(*ctx.fixture::<String>("url").unwrap(), String::new());
    }
}
