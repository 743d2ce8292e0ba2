use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::order::OrderStatus;

/// Domain events emitted after a successful write. Delivery is in-process and
/// best-effort: a view that misses an event falls back to its full reload
/// path, which stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    OrderRescheduled {
        order_id: Uuid,
        old_date: NaiveDate,
        new_date: NaiveDate,
    },
    OrderFulfilled(Uuid),
    ClientCreated(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Capacity of the fan-out channel; a lagging subscriber loses the oldest
/// events rather than blocking writers.
const FANOUT_CAPACITY: usize = 256;

/// Creates the broadcast channel observers subscribe to.
pub fn fanout_channel() -> broadcast::Sender<Event> {
    broadcast::channel(FANOUT_CAPACITY).0
}

/// Drains the event queue, logs every event and forwards it to all current
/// subscribers. Runs for the lifetime of the process.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, fanout: broadcast::Sender<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(
                %order_id,
                old_status = %old_status,
                new_status = %new_status,
                "Order status changed"
            ),
            Event::OrderRescheduled {
                order_id,
                old_date,
                new_date,
            } => info!(%order_id, %old_date, %new_date, "Order rescheduled"),
            Event::OrderFulfilled(order_id) => info!(%order_id, "Order fulfilled"),
            other => info!("Received event: {:?}", other),
        }

        // No receivers is fine; the send only fails when nobody listens.
        if fanout.receiver_count() > 0 {
            if let Err(e) = fanout.send(event) {
                warn!("Failed to fan out event: {}", e);
            }
        }
    }

    info!("Event processing loop stopped");
}
