//! RPC invoker: issues one typed call with a bounded timeout and classifies
//! the outcome.
//!
//! # Outcome classes
//! - `Rejected`: the backend answered and declined (duplicate, not-found).
//!   Terminal, never retried, reported to the breaker as a success — the
//!   backend is reachable and functioning.
//! - `Transient`: timeout, transport error, unavailable. Reported to the
//!   breaker as a failure and eligible for retry.
//!
//! The invoker is a trait so tests can substitute scripted backends for the
//! real gRPC transport.

use async_trait::async_trait;
use tonic::{Code, Status};

use crate::config::TimeoutConfig;
use crate::rpc::client::ItemServiceClient;
use crate::rpc::connection::BackendConnection;
use crate::rpc::proto::Item;

/// Application-level rejection: a business-rule refusal from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotFound(String),
    AlreadyExists(String),
    /// Any other explicit refusal (bad argument, malformed reply).
    Other(String),
}

/// Classified failure of a single RPC attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcFailure {
    Rejected(Rejection),
    Transient(String),
}

pub type RpcResult<T> = Result<T, RpcFailure>;

/// Item state before and after an update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedItem {
    pub old: Item,
    pub new: Item,
}

/// The outbound RPC contract the gateway is a client of.
#[async_trait]
pub trait ItemBackend: Send + Sync {
    async fn add_item(&self, item: Item) -> RpcResult<Item>;

    /// Returns every item matching the filter; an empty list is a valid
    /// success (the gateway decides what "none found" means to the client).
    async fn get_items(&self, filter: Item) -> RpcResult<Vec<Item>>;

    async fn update_item(&self, item: Item) -> RpcResult<UpdatedItem>;

    async fn delete_item(&self, id: i64) -> RpcResult<Item>;

    /// Tear down and recreate the underlying connection. Invoked before a
    /// half-open probe executes.
    fn reset(&self);
}

/// Map a gRPC status onto the failure taxonomy.
fn classify(status: Status) -> RpcFailure {
    match status.code() {
        Code::NotFound => RpcFailure::Rejected(Rejection::NotFound(status.message().to_string())),
        Code::AlreadyExists => {
            RpcFailure::Rejected(Rejection::AlreadyExists(status.message().to_string()))
        }
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            RpcFailure::Rejected(Rejection::Other(status.message().to_string()))
        }
        code => RpcFailure::Transient(format!("{:?}: {}", code, status.message())),
    }
}

/// `ItemBackend` over a real tonic channel.
pub struct GrpcItemBackend {
    conn: BackendConnection,
    timeouts: TimeoutConfig,
}

impl GrpcItemBackend {
    pub fn new(conn: BackendConnection, timeouts: TimeoutConfig) -> Self {
        Self { conn, timeouts }
    }

    fn client(&self) -> ItemServiceClient {
        ItemServiceClient::new(self.conn.channel())
    }
}

#[async_trait]
impl ItemBackend for GrpcItemBackend {
    #[tracing::instrument(skip_all, fields(operation = "AddItem", id = item.id))]
    async fn add_item(&self, item: Item) -> RpcResult<Item> {
        let mut client = self.client();
        let reply = match tokio::time::timeout(self.timeouts.write(), client.add_item(item)).await {
            Err(_) => return Err(RpcFailure::Transient("deadline exceeded".into())),
            Ok(Err(status)) => return Err(classify(status)),
            Ok(Ok(response)) => response.into_inner(),
        };

        if !reply.result {
            // The backend signals duplicates through the result flag rather
            // than a status code.
            return Err(RpcFailure::Rejected(Rejection::AlreadyExists(
                "Item with ID or name already exists.".into(),
            )));
        }
        reply.added_item.ok_or_else(|| {
            RpcFailure::Rejected(Rejection::Other("backend reply missing item payload".into()))
        })
    }

    #[tracing::instrument(skip_all, fields(operation = "GetItem", id = filter.id))]
    async fn get_items(&self, filter: Item) -> RpcResult<Vec<Item>> {
        let mut client = self.client();
        let read = async {
            let mut stream = client.get_item(filter).await?.into_inner();
            let mut items = Vec::new();
            while let Some(reply) = stream.message().await? {
                if reply.result {
                    if let Some(item) = reply.requested_item {
                        items.push(item);
                    }
                }
            }
            Ok::<_, Status>(items)
        };

        match tokio::time::timeout(self.timeouts.read(), read).await {
            Err(_) => Err(RpcFailure::Transient("deadline exceeded".into())),
            Ok(Err(status)) => Err(classify(status)),
            Ok(Ok(items)) => Ok(items),
        }
    }

    #[tracing::instrument(skip_all, fields(operation = "UpdateItem", id = item.id))]
    async fn update_item(&self, item: Item) -> RpcResult<UpdatedItem> {
        let mut client = self.client();
        let reply =
            match tokio::time::timeout(self.timeouts.write(), client.update_item(item)).await {
                Err(_) => return Err(RpcFailure::Transient("deadline exceeded".into())),
                Ok(Err(status)) => return Err(classify(status)),
                Ok(Ok(response)) => response.into_inner(),
            };

        match (reply.result, reply.old_item, reply.new_item) {
            (true, Some(old), Some(new)) => Ok(UpdatedItem { old, new }),
            (false, _, _) => Err(RpcFailure::Rejected(Rejection::NotFound(
                "Item not found.".into(),
            ))),
            _ => Err(RpcFailure::Rejected(Rejection::Other(
                "backend reply missing item payload".into(),
            ))),
        }
    }

    #[tracing::instrument(skip_all, fields(operation = "DeleteItem", id))]
    async fn delete_item(&self, id: i64) -> RpcResult<Item> {
        let mut client = self.client();
        let request = Item {
            id,
            name: String::new(),
        };
        let reply =
            match tokio::time::timeout(self.timeouts.write(), client.delete_item(request)).await {
                Err(_) => return Err(RpcFailure::Transient("deadline exceeded".into())),
                Ok(Err(status)) => return Err(classify(status)),
                Ok(Ok(response)) => response.into_inner(),
            };

        match (reply.result, reply.deleted_item) {
            (true, Some(item)) => Ok(item),
            (false, _) => Err(RpcFailure::Rejected(Rejection::NotFound(
                "Item not found.".into(),
            ))),
            _ => Err(RpcFailure::Rejected(Rejection::Other(
                "backend reply missing item payload".into(),
            ))),
        }
    }

    fn reset(&self) {
        self.conn.recreate();
    }
}
