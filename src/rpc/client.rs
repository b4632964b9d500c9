//! Typed gRPC stub for `myitems.ItemService`.
//!
//! A thin wrapper over `tonic::client::Grpc` with one method per RPC.
//! Constructed per call from the current canonical channel, so a channel
//! swap (half-open probe) takes effect on the next attempt.

use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;
use tonic::{Request, Response, Status, Streaming};

use crate::rpc::proto::{
    AddItemResponse, DeleteItemResponse, GetItemResponse, Item, UpdateItemResponse,
};

#[derive(Debug, Clone)]
pub struct ItemServiceClient {
    inner: Grpc<Channel>,
}

impl ItemServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("channel not ready: {e}")))
    }

    pub async fn add_item(&mut self, item: Item) -> Result<Response<AddItemResponse>, Status> {
        self.ready().await?;
        let codec: ProstCodec<Item, AddItemResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/myitems.ItemService/AddItem");
        self.inner.unary(Request::new(item), path, codec).await
    }

    /// Server-streaming: the backend emits one response per matching item.
    pub async fn get_item(
        &mut self,
        filter: Item,
    ) -> Result<Response<Streaming<GetItemResponse>>, Status> {
        self.ready().await?;
        let codec: ProstCodec<Item, GetItemResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/myitems.ItemService/GetItem");
        self.inner
            .server_streaming(Request::new(filter), path, codec)
            .await
    }

    pub async fn update_item(
        &mut self,
        item: Item,
    ) -> Result<Response<UpdateItemResponse>, Status> {
        self.ready().await?;
        let codec: ProstCodec<Item, UpdateItemResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/myitems.ItemService/UpdateItem");
        self.inner.unary(Request::new(item), path, codec).await
    }

    pub async fn delete_item(
        &mut self,
        item: Item,
    ) -> Result<Response<DeleteItemResponse>, Status> {
        self.ready().await?;
        let codec: ProstCodec<Item, DeleteItemResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/myitems.ItemService/DeleteItem");
        self.inner.unary(Request::new(item), path, codec).await
    }
}
