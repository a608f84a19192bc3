//! The capability interface the dispatcher orders through, and its gRPC
//! adapter.
//!
//! [`WaiterChannel`] exposes one method per RPC call shape of the `Waiter`
//! service and nothing else: wire encoding, connection management and
//! compression all stay behind the implementation. [`GrpcWaiter`] is the
//! adapter over a `tonic` transport channel.

use futures::stream::{BoxStream, StreamExt};
use patron_core::proto::{BatchMeals, Meal, MealRequest, SingleOrder, waiter_client::WaiterClient};
use tonic::{
    Status,
    codec::CompressionEncoding,
    transport::{Channel, Endpoint},
};

/// Meals streamed back by the server, ending at end-of-stream or the first
/// error.
pub type MealStream = BoxStream<'static, Result<Meal, Status>>;

/// Batches streamed back by the server during a bidirectional exchange.
pub type BatchStream = BoxStream<'static, Result<BatchMeals, Status>>;

/// An outbound message stream. The stream ending is the half-close.
pub type Outbound<T> = BoxStream<'static, T>;

/// A connected handle to the kitchen's `Waiter` service.
///
/// Implementations are owned by the caller; the dispatcher never opens or
/// closes the underlying connection.
#[tonic::async_trait(?Send)]
pub trait WaiterChannel: Send {
    /// Unary call.
    async fn staff_order(&mut self, order: SingleOrder) -> Result<Meal, Status>;

    /// Server-streaming call.
    async fn eastern_host_order(&mut self, request: MealRequest) -> Result<MealStream, Status>;

    /// Client-streaming call. Resolves once `orders` has ended and the server
    /// has answered with its single aggregated response.
    async fn western_host_order(
        &mut self,
        orders: Outbound<SingleOrder>,
    ) -> Result<BatchMeals, Status>;

    /// Bidirectional call. `requests` is driven by the transport while the
    /// returned stream is read, so neither side blocks the other.
    async fn dim_sum_order(
        &mut self,
        requests: Outbound<MealRequest>,
    ) -> Result<BatchStream, Status>;
}

/// [`WaiterChannel`] over a `tonic` HTTP/2 channel.
#[derive(Clone, Debug)]
pub struct GrpcWaiter {
    client: WaiterClient<Channel>,
}

impl GrpcWaiter {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: WaiterClient::new(channel),
        }
    }

    /// Builds a channel to `addr` without connecting. The connection is
    /// established on the first call, so a refused connection surfaces as an
    /// `Unavailable` status from that call.
    pub fn connect_lazy(addr: &str) -> patron_core::Result<Self> {
        let channel = Endpoint::from_shared(addr.to_string())?.connect_lazy();
        Ok(Self::new(channel))
    }

    /// Compresses outbound messages and advertises support for compressed
    /// responses with the same encoding.
    pub fn with_compression(mut self, encoding: Option<CompressionEncoding>) -> Self {
        if let Some(encoding) = encoding {
            self.client = self
                .client
                .send_compressed(encoding)
                .accept_compressed(encoding);
        }
        self
    }
}

#[tonic::async_trait(?Send)]
impl WaiterChannel for GrpcWaiter {
    async fn staff_order(&mut self, order: SingleOrder) -> Result<Meal, Status> {
        Ok(self.client.staff_order(order).await?.into_inner())
    }

    async fn eastern_host_order(&mut self, request: MealRequest) -> Result<MealStream, Status> {
        Ok(self
            .client
            .eastern_host_order(request)
            .await?
            .into_inner()
            .boxed())
    }

    async fn western_host_order(
        &mut self,
        orders: Outbound<SingleOrder>,
    ) -> Result<BatchMeals, Status> {
        Ok(self.client.western_host_order(orders).await?.into_inner())
    }

    async fn dim_sum_order(
        &mut self,
        requests: Outbound<MealRequest>,
    ) -> Result<BatchStream, Status> {
        Ok(self.client.dim_sum_order(requests).await?.into_inner().boxed())
    }
}
