//! Per-category change notification pushed to registered listeners.

use std::fmt;

use foundation::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::category::Category;
use crate::layer::LayerSummary;

/// Full state of one category after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySnapshot {
    pub layers: Vec<LayerSummary>,
    pub last_updated: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub category: Category,
    pub snapshot: CategorySnapshot,
}

impl CategoryUpdate {
    /// Key the update is published under, e.g. `baseLayers`.
    pub fn key(&self) -> String {
        format!("{}Layers", self.category.key())
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.key(), json!(self.snapshot));
        Value::Object(map)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListenerFilter {
    All,
    Category(Category),
}

impl ListenerFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            ListenerFilter::All => true,
            ListenerFilter::Category(c) => c == category,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&CategoryUpdate)>;

struct Listener {
    id: ListenerId,
    filter: ListenerFilter,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, filter: ListenerFilter, callback: Callback) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.push(Listener {
            id,
            filter,
            callback,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    /// Whether anyone would receive an update for `category`.
    pub(crate) fn wants(&self, category: Category) -> bool {
        self.entries.iter().any(|l| l.filter.matches(category))
    }

    pub(crate) fn publish(&mut self, update: &CategoryUpdate) {
        for listener in &mut self.entries {
            if listener.filter.matches(update.category) {
                (listener.callback)(update);
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
