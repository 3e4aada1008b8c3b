//! Medicine order tracking.
//!
//! Orders move one step per tick along
//! `placed -> processing -> shipped -> out-for-delivery -> delivered`. Cancellation is only
//! allowed before shipping.

use crate::realtime::PeriodicJob;
use crate::{StoreError, StoreResult};
use careportal_ids::EventId;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Placed,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The following step, or `None` for terminal states.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Placed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Placed | Self::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price_cents: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price_cents,
        }
    }

    pub fn subtotal_cents(&self) -> u64 {
        u64::from(self.quantity) * self.unit_price_cents
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineOrder {
    pub id: EventId,
    pub items: Vec<OrderItem>,
    pub total_cents: u64,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct OrderTracker {
    orders: Vec<MedicineOrder>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker with a couple of pending pharmacy orders to animate.
    pub fn with_sample_orders() -> Self {
        let mut tracker = Self::new();
        let samples = [
            vec![
                OrderItem::new("Lisinopril 10mg (30 tablets)", 1, 1_299),
                OrderItem::new("Vitamin D3 1000 IU", 2, 849),
            ],
            vec![OrderItem::new("Cetirizine 10mg (14 tablets)", 1, 599)],
        ];
        for items in samples {
            // Sample items are non-empty with positive quantities.
            if let Err(e) = tracker.place_order(items) {
                tracing::warn!("skipping sample order: {}", e);
            }
        }
        tracker
    }

    pub fn orders(&self) -> &[MedicineOrder] {
        &self.orders
    }

    pub fn get(&self, id: &EventId) -> Option<&MedicineOrder> {
        self.orders.iter().find(|o| o.id == *id)
    }

    /// Orders that can still change status.
    pub fn active(&self) -> impl Iterator<Item = &MedicineOrder> {
        self.orders.iter().filter(|o| !o.status.is_terminal())
    }

    /// Places a new order in the `placed` state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `items` is empty or any item has a zero quantity.
    pub fn place_order(&mut self, items: Vec<OrderItem>) -> StoreResult<&MedicineOrder> {
        if items.is_empty() {
            return Err(StoreError::InvalidInput(
                "an order needs at least one item".into(),
            ));
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(StoreError::InvalidInput(format!(
                "quantity for '{}' must be positive",
                item.name
            )));
        }

        let now = Utc::now();
        let order = MedicineOrder {
            id: EventId::new(),
            total_cents: items.iter().map(OrderItem::subtotal_cents).sum(),
            items,
            status: OrderStatus::Placed,
            placed_at: now,
            updated_at: now,
        };
        tracing::debug!("placed order {} ({} cents)", order.id, order.total_cents);
        self.orders.push(order);

        let index = self.orders.len() - 1;
        Ok(&self.orders[index])
    }

    /// Cancels an order that has not shipped yet.
    ///
    /// `Ok(None)` if the id is unknown. Cancelling an already cancelled order is a no-op.
    pub fn cancel(&mut self, id: &EventId) -> StoreResult<Option<&MedicineOrder>> {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == *id) else {
            return Ok(None);
        };

        match order.status {
            OrderStatus::Cancelled => {}
            status if status.is_cancellable() => {
                order.status = OrderStatus::Cancelled;
                order.updated_at = Utc::now();
                tracing::debug!("cancelled order {}", order.id);
            }
            status => {
                return Err(StoreError::InvalidInput(format!(
                    "order {} is already {}",
                    order.id, status
                )));
            }
        }

        Ok(Some(&*order))
    }

    /// Moves the order one step forward. Returns the new status, or `None` if the id is
    /// unknown or the order is terminal.
    pub fn advance(&mut self, id: &EventId) -> Option<OrderStatus> {
        let order = self.orders.iter_mut().find(|o| o.id == *id)?;
        let next = order.status.next()?;
        order.status = next;
        order.updated_at = Utc::now();
        Some(next)
    }
}

impl PeriodicJob for OrderTracker {
    fn name(&self) -> &str {
        "orders"
    }

    fn tick(&mut self, rng: &mut dyn RngCore) {
        let active: Vec<EventId> = self.active().map(|o| o.id).collect();
        let Some(id) = active.choose(rng).copied() else {
            return;
        };
        if let Some(status) = self.advance(&id) {
            tracing::info!("order {} is now {}", id, status);
        }
    }
}
