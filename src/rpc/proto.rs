//! Wire types for the `myitems.ItemService` gRPC contract.
//!
//! Hand-rolled prost messages; field tags match the backend service's proto
//! definition. `Item` doubles as the HTTP-facing JSON shape, so it also
//! carries serde derives.

use serde::{Deserialize, Serialize};

/// The item resource. Owned by the backend service; the gateway only
/// transports it.
#[derive(Clone, PartialEq, Serialize, Deserialize, prost::Message)]
pub struct Item {
    #[prost(int64, tag = "1")]
    pub id: i64,

    #[prost(string, tag = "2")]
    pub name: String,
}

/// Reply to `AddItem`. `result` is false when the id or name is taken.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AddItemResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,

    #[prost(message, optional, tag = "2")]
    pub added_item: Option<Item>,
}

/// One element of the `GetItem` server stream.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetItemResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,

    #[prost(message, optional, tag = "2")]
    pub requested_item: Option<Item>,
}

/// Reply to `UpdateItem`, echoing the state before and after.
#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateItemResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,

    #[prost(message, optional, tag = "2")]
    pub old_item: Option<Item>,

    #[prost(message, optional, tag = "3")]
    pub new_item: Option<Item>,
}

/// Reply to `DeleteItem`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteItemResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,

    #[prost(message, optional, tag = "2")]
    pub deleted_item: Option<Item>,
}
