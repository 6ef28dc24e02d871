use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::trie::PatternTrie;

/// A published display value. Cloning shares the value.
#[derive(Clone)]
pub struct ViewValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ViewValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }
}

impl fmt::Debug for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewValue")
            .field("type_id", &self.type_id())
            .finish()
    }
}

/// Handle returned by `ViewStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ViewHandler = Box<dyn Fn(&str, &ViewValue) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    handler: ViewHandler,
}

/// Path-keyed display state.
///
/// The cart writes here after every transition; renderers read by path or
/// subscribe with a pattern and are called synchronously on each change.
pub struct ViewStore {
    values: BTreeMap<String, ViewValue>,
    subscribers: PatternTrie<Subscriber>,
    next_id: u64,
}

impl ViewStore {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            subscribers: PatternTrie::new(),
            next_id: 1,
        }
    }

    /// Store `value` at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&mut self, path: &str, value: T) {
        let value = ViewValue::new(value);
        self.values.insert(path.to_string(), value.clone());
        self.notify(path, &value);
    }

    /// Like `set`, but stays quiet when the stored value is equal.
    /// Returns whether anything was published.
    pub fn publish<T>(&mut self, path: &str, value: T) -> bool
    where
        T: Any + Send + Sync + PartialEq,
    {
        let unchanged = self
            .values
            .get(path)
            .and_then(|v| v.downcast_ref::<T>())
            .is_some_and(|current| *current == value);
        if unchanged {
            return false;
        }
        self.set(path, value);
        true
    }

    pub fn get(&self, path: &str) -> Option<ViewValue> {
        self.values.get(path).cloned()
    }

    /// Typed read. `None` when missing or of another type.
    pub fn read<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.values.get(path)?.downcast_ref::<T>().cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// All stored values, ordered by path.
    pub fn snapshot(&self) -> Vec<(String, ViewValue)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn subscribe<F>(&mut self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &ViewValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(
            pattern,
            Subscriber {
                id,
                handler: Box::new(handler),
            },
        );
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, pattern: &str, id: SubscriptionId) -> bool {
        self.subscribers.remove(pattern, |s| s.id == id) > 0
    }

    fn notify(&self, path: &str, value: &ViewValue) {
        let subscribers = self.subscribers.matches(path);
        debug!(path, subscribers = subscribers.len(), "view: published");
        for s in subscribers {
            (s.handler)(path, value);
        }
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}
