//! Shared fakes for integration testing.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use item_gateway::rpc::backend::{ItemBackend, Rejection, RpcFailure, RpcResult, UpdatedItem};
use item_gateway::rpc::proto::Item;

/// Backend that replays a scripted sequence of outcomes, one per call,
/// regardless of which operation is invoked. Counts calls and connection
/// resets so tests can assert what the resilience layer actually did.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<RpcResult<Item>>>,
    pub calls: AtomicU32,
    pub resets: AtomicU32,
}

impl ScriptedBackend {
    pub fn new(steps: Vec<RpcResult<Item>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            calls: AtomicU32::new(0),
            resets: AtomicU32::new(0),
        })
    }

    /// Every call fails with a transient error.
    pub fn unreachable() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn push(&self, step: RpcResult<Item>) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::SeqCst)
    }

    fn next(&self) -> RpcResult<Item> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcFailure::Transient("connection refused".into())))
    }
}

pub fn transient() -> RpcResult<Item> {
    Err(RpcFailure::Transient("connection refused".into()))
}

pub fn ok(id: i64, name: &str) -> RpcResult<Item> {
    Ok(Item {
        id,
        name: name.to_string(),
    })
}

#[async_trait]
impl ItemBackend for ScriptedBackend {
    async fn add_item(&self, _item: Item) -> RpcResult<Item> {
        self.next()
    }

    async fn get_items(&self, _filter: Item) -> RpcResult<Vec<Item>> {
        self.next().map(|item| vec![item])
    }

    async fn update_item(&self, _item: Item) -> RpcResult<UpdatedItem> {
        self.next().map(|item| UpdatedItem {
            old: item.clone(),
            new: item,
        })
    }

    async fn delete_item(&self, _id: i64) -> RpcResult<Item> {
        self.next()
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory backend with the real service's business rules: unique id and
/// name on create, not-found on missing targets. Lets the HTTP tests run
/// the full CRUD scenario without a gRPC server.
#[derive(Default)]
pub struct StoreBackend {
    items: Mutex<HashMap<i64, String>>,
}

impl StoreBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ItemBackend for StoreBackend {
    async fn add_item(&self, item: Item) -> RpcResult<Item> {
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&item.id) || items.values().any(|name| *name == item.name) {
            return Err(RpcFailure::Rejected(Rejection::AlreadyExists(
                "Item with ID or name already exists.".into(),
            )));
        }
        items.insert(item.id, item.name.clone());
        Ok(item)
    }

    async fn get_items(&self, filter: Item) -> RpcResult<Vec<Item>> {
        let items = self.items.lock().unwrap();
        let matches = items
            .iter()
            .filter(|(id, name)| {
                (filter.id != 0 && **id == filter.id)
                    || (!filter.name.is_empty() && **name == filter.name)
            })
            .map(|(id, name)| Item {
                id: *id,
                name: name.clone(),
            })
            .collect();
        Ok(matches)
    }

    async fn update_item(&self, item: Item) -> RpcResult<UpdatedItem> {
        let mut items = self.items.lock().unwrap();
        match items.get_mut(&item.id) {
            Some(name) => {
                let old = Item {
                    id: item.id,
                    name: name.clone(),
                };
                *name = item.name.clone();
                Ok(UpdatedItem { old, new: item })
            }
            None => Err(RpcFailure::Rejected(Rejection::NotFound(
                "Item not found.".into(),
            ))),
        }
    }

    async fn delete_item(&self, id: i64) -> RpcResult<Item> {
        let mut items = self.items.lock().unwrap();
        match items.remove(&id) {
            Some(name) => Ok(Item { id, name }),
            None => Err(RpcFailure::Rejected(Rejection::NotFound(
                "Item not found.".into(),
            ))),
        }
    }

    fn reset(&self) {}
}
