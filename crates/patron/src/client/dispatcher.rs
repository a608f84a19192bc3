//! Drives orders over the four RPC call shapes of the `Waiter` service.
//!
//! [`Dispatcher`] turns a logical order into the matching call on a
//! [`WaiterChannel`] and funnels every produced meal to a [`Sink`] as it
//! arrives. Each operation resolves exactly once: the returned [`Result`] and
//! the single [`Sink::complete`] call carry the same outcome.
//!
//! ## Guarantees
//!
//! - Meals and batches are forwarded unfiltered, in arrival order.
//! - Anything delivered before a failure stays delivered; nothing is delivered
//!   after it.
//! - Remote failures are surfaced unchanged as [`Error::Remote`] and never
//!   retried.
//! - Outbound streams end (half-close) only after every requested order has
//!   been sent.

use crate::client::{
    channel::{Outbound, WaiterChannel},
    pacing::{INTERACTIVE_PACING, Pacing, STAGED_PACING},
    sink::{OrderKind, Sink},
};
use futures::{StreamExt, TryStreamExt, stream};
use patron_core::{
    Error, Result,
    proto::{BatchMeals, Meal, MealRequest, SingleOrder},
    types::MealId,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

/// Capacity of the queue between the request feeder and the transport during
/// a bidirectional exchange. At most one request waits to be written.
const REQUEST_BUFFER_SIZE: usize = 1;

/// Places orders on a channel it has exclusive use of for the duration of
/// each operation.
pub struct Dispatcher<C> {
    channel: C,
    staged: Pacing,
    interactive: Pacing,
}

impl<C: WaiterChannel> Dispatcher<C> {
    /// Creates a dispatcher with the default pacing for streamed orders.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            staged: STAGED_PACING,
            interactive: INTERACTIVE_PACING,
        }
    }

    /// Overrides the delays between client-streamed sends.
    pub fn with_pacing(mut self, staged: Pacing, interactive: Pacing) -> Self {
        self.staged = staged;
        self.interactive = interactive;
        self
    }

    /// Orders a single meal with a unary call.
    #[tracing::instrument(name = "staff_order", skip_all, fields(meal_id = meal_id))]
    pub async fn submit_single_order<S>(&mut self, meal_id: MealId, sink: &mut S) -> Result<Meal>
    where
        S: Sink + ?Sized,
    {
        let outcome = match self.channel.staff_order(SingleOrder::from(meal_id)).await {
            Ok(meal) => {
                sink.report_meal(OrderKind::Staff, &meal);
                Ok(meal)
            }
            Err(status) => Err(Error::from(status)),
        };
        finish(sink, OrderKind::Staff, outcome)
    }

    /// Requests every meal in one message and reports each streamed meal as
    /// it is served. Returns how many meals were delivered.
    #[tracing::instrument(name = "eastern_host_order", skip_all, fields(meals = meal_ids.len()))]
    pub async fn submit_batch_request<S>(
        &mut self,
        meal_ids: Vec<MealId>,
        sink: &mut S,
    ) -> Result<usize>
    where
        S: Sink + ?Sized,
    {
        let outcome = self.stream_meals(meal_ids, sink).await;
        finish(sink, OrderKind::Eastern, outcome)
    }

    /// Streams one order per meal, paced, then half-closes and reports the
    /// single aggregated batch.
    #[tracing::instrument(name = "western_host_order", skip_all, fields(meals = meal_ids.len()))]
    pub async fn submit_staged_orders<S>(
        &mut self,
        meal_ids: Vec<MealId>,
        sink: &mut S,
    ) -> Result<BatchMeals>
    where
        S: Sink + ?Sized,
    {
        let pacing = self.staged;
        let orders: Outbound<SingleOrder> = stream::iter(meal_ids.into_iter().enumerate())
            .then(move |(index, meal_id)| async move {
                if index > 0 {
                    pacing.pause().await;
                }
                tracing::debug!(meal_id, "sending order");
                SingleOrder::from(meal_id)
            })
            .boxed();

        let outcome = match self.channel.western_host_order(orders).await {
            Ok(batch) => {
                sink.report_batch(&batch);
                Ok(batch)
            }
            Err(status) => Err(Error::from(status)),
        };
        finish(sink, OrderKind::Western, outcome)
    }

    /// Sends each batch as its own request while reporting every batch the
    /// kitchen sends back, in whatever rhythm it chooses. Returns how many
    /// batches were delivered.
    #[tracing::instrument(name = "dim_sum_order", skip_all, fields(batches = batches.len()))]
    pub async fn submit_interactive_orders<S>(
        &mut self,
        batches: Vec<Vec<MealId>>,
        sink: &mut S,
    ) -> Result<usize>
    where
        S: Sink + ?Sized,
    {
        let outcome = self.exchange(batches, sink).await;
        finish(sink, OrderKind::DimSum, outcome)
    }

    async fn stream_meals<S>(&mut self, meal_ids: Vec<MealId>, sink: &mut S) -> Result<usize>
    where
        S: Sink + ?Sized,
    {
        let mut meals = self
            .channel
            .eastern_host_order(MealRequest::from(meal_ids))
            .await?;

        let mut delivered = 0;
        while let Some(meal) = meals.try_next().await? {
            sink.report_meal(OrderKind::Eastern, &meal);
            delivered += 1;
        }
        Ok(delivered)
    }

    async fn exchange<S>(&mut self, batches: Vec<Vec<MealId>>, sink: &mut S) -> Result<usize>
    where
        S: Sink + ?Sized,
    {
        let (req_tx, req_rx) = mpsc::channel(REQUEST_BUFFER_SIZE);
        let pacing = self.interactive;

        // Requests are fed from their own task so pacing never holds up the
        // inbound side. Dropping `req_tx` ends the request stream.
        let feeder = tokio::spawn(
            async move {
                let mut sent = 0usize;
                for (index, meal_ids) in batches.into_iter().enumerate() {
                    if index > 0 {
                        pacing.pause().await;
                    }
                    tracing::debug!(?meal_ids, "sending cart request");
                    if req_tx.send(MealRequest::from(meal_ids)).await.is_err() {
                        tracing::debug!("exchange closed before every cart was requested");
                        break;
                    }
                    sent += 1;
                }
                sent
            }
            .in_current_span(),
        );

        let received = self
            .drain_batches(ReceiverStream::new(req_rx).boxed(), sink)
            .await;

        // Inbound end-of-stream (or failure) ends the exchange. A feeder still
        // pacing at that point has nobody left to talk to.
        feeder.abort();
        let delivered = received?;
        match feeder.await {
            Ok(sent) => tracing::debug!(sent, delivered, "exchange finished"),
            Err(e) if e.is_cancelled() => {
                tracing::debug!(delivered, "kitchen ended the exchange early");
            }
            Err(e) => {
                return Err(Error::ChannelError {
                    context: format!("request feeder failed: {e}"),
                });
            }
        }
        Ok(delivered)
    }

    async fn drain_batches<S>(
        &mut self,
        requests: Outbound<MealRequest>,
        sink: &mut S,
    ) -> Result<usize>
    where
        S: Sink + ?Sized,
    {
        let mut batches = self.channel.dim_sum_order(requests).await?;

        let mut delivered = 0;
        while let Some(batch) = batches.try_next().await? {
            sink.report_batch(&batch);
            delivered += 1;
        }
        Ok(delivered)
    }
}

/// Signals completion exactly once and hands the outcome back to the caller.
fn finish<S, T>(sink: &mut S, order: OrderKind, outcome: Result<T>) -> Result<T>
where
    S: Sink + ?Sized,
{
    sink.complete(order, outcome.as_ref().map(|_| ()));
    outcome
}
