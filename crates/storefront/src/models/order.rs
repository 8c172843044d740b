//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use apex_core::{
    LineItem, OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, ShippingInfo,
    UserId,
};

/// A placed order. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Sum of line price × quantity at placement time.
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// A line of a placed order, joined with the product's current details.
///
/// `price` is the unit price snapshotted at purchase. `name` and `image` are
/// read at query time and are `None` once the product has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub size: String,
    pub price: Price,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// An order together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// A validated request to place an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<LineItem>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    /// Total the client displayed, if it sent one. Informational only.
    pub client_total: Option<Decimal>,
}
