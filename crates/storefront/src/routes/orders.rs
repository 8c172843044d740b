//! Order route handlers. All require a bearer token.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use apex_core::{LineItem, OrderId, PaymentMethod, ShippingInfo};

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, Order, OrderDetail};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Order placement request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<LineItem>,
    /// Total shown to the shopper. Compared with the computed total, never stored.
    #[serde(default)]
    pub total: Option<Decimal>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
}

impl From<PlaceOrderRequest> for NewOrder {
    fn from(body: PlaceOrderRequest) -> Self {
        Self {
            items: body.items,
            shipping_info: body.shipping_info,
            payment_method: body.payment_method,
            client_total: body.total,
        }
    }
}

/// Order placement response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let order_id = OrderService::new(state.pool())
        .place_order(user.id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(PlaceOrderResponse { order_id })))
}

/// GET /api/orders
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_orders(&user).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<OrderDetail>> {
    let order = OrderService::new(state.pool()).get_order(&user, id).await?;
    Ok(Json(order))
}
