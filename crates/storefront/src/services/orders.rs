//! Order service: atomic order placement and order queries.
//!
//! Placing an order is a single transaction. Every line's stock is taken
//! with a conditional decrement, every line is priced from the catalog, and
//! the order with its lines is written. Any failure rolls the whole
//! transaction back, so a rejected order leaves no trace.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use apex_core::{LineItem, OrderId, Price, ProductId, ShippingError, UserId, merge_lines};

use crate::db::orders::{insert_item, insert_order};
use crate::db::products::{decrement_stock, fetch_product};
use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CurrentUser, NewOrder, Order, OrderDetail};

/// Errors from order placement and order queries.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order has no lines.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A line asks for zero units.
    #[error("quantity for product {0} must be at least 1")]
    InvalidQuantity(ProductId),

    /// The shipping address is incomplete.
    #[error(transparent)]
    InvalidShipping(#[from] ShippingError),

    /// A line references a product that does not exist.
    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    /// A line asks for a size the product is not offered in.
    #[error("size {size} is not available for product {product_id}")]
    InvalidSize { product_id: ProductId, size: String },

    /// A line asks for more units than are in stock.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The order total does not fit in a decimal.
    #[error("order total is too large")]
    TotalOverflow,

    /// No order has this ID.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The caller neither owns the order nor is an admin.
    #[error("not allowed to view order {0}")]
    Forbidden(OrderId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Order service.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for `user_id` and return its ID.
    ///
    /// Lines naming the same product and size are merged first. Unit prices
    /// come from the catalog; the client's total is only compared and logged.
    ///
    /// # Errors
    ///
    /// Returns `EmptyOrder`, `InvalidQuantity` or `InvalidShipping` for a
    /// malformed request, and `UnknownProduct`, `InvalidSize` or
    /// `InsufficientStock` when a line cannot be fulfilled. Nothing is
    /// written in any error case.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn place_order(&self, user_id: UserId, order: NewOrder) -> Result<OrderId, OrderError> {
        if order.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(line) = order.items.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::InvalidQuantity(line.product_id));
        }
        let shipping_info = order.shipping_info.validated()?;
        let lines = merge_lines(order.items);

        let mut tx = self.pool.begin().await?;

        let mut priced: Vec<(LineItem, Price)> = Vec::with_capacity(lines.len());
        let mut total: Option<Price> = None;
        for line in lines {
            // Decrement before reading so the transaction holds the write lock
            // from its first statement.
            if !decrement_stock(&mut *tx, line.product_id, line.quantity).await? {
                return Err(match fetch_product(&mut *tx, line.product_id).await? {
                    None => OrderError::UnknownProduct(line.product_id),
                    Some(product) => OrderError::InsufficientStock {
                        product_id: line.product_id,
                        requested: line.quantity,
                        available: product.stock,
                    },
                });
            }

            let product = fetch_product(&mut *tx, line.product_id)
                .await?
                .ok_or(OrderError::UnknownProduct(line.product_id))?;
            if !product.sizes.contains(&line.size) {
                return Err(OrderError::InvalidSize {
                    product_id: line.product_id,
                    size: line.size,
                });
            }

            let line_total = product
                .price
                .times(line.quantity)
                .ok_or(OrderError::TotalOverflow)?;
            total = Some(match total {
                None => line_total,
                Some(sum) => sum.checked_add(line_total).ok_or(OrderError::TotalOverflow)?,
            });
            priced.push((line, product.price));
        }
        let total = total.ok_or(OrderError::EmptyOrder)?;

        let order_id = insert_order(
            &mut *tx,
            user_id,
            total,
            &shipping_info,
            order.payment_method,
        )
        .await?;
        for (line, unit_price) in &priced {
            insert_item(&mut *tx, order_id, line, *unit_price).await?;
        }

        tx.commit().await?;

        log_total_mismatch(order_id, order.client_total, total);
        tracing::info!(%order_id, %user_id, %total, "order placed");
        Ok(order_id)
    }

    /// Orders visible to the caller: all of them for admins, otherwise
    /// only the caller's own. Most recent first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_orders(&self, caller: &CurrentUser) -> Result<Vec<Order>, OrderError> {
        let orders = if caller.is_admin() {
            self.orders.list_all().await?
        } else {
            self.orders.list_for_user(caller.id).await?
        };
        Ok(orders)
    }

    /// One order with its lines, for its owner or an admin.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no order has this ID and
    /// `OrderError::Forbidden` if the caller may not see it.
    pub async fn get_order(
        &self,
        caller: &CurrentUser,
        id: OrderId,
    ) -> Result<OrderDetail, OrderError> {
        let order = self.orders.get(id).await?.ok_or(OrderError::NotFound(id))?;
        if order.user_id != caller.id && !caller.is_admin() {
            return Err(OrderError::Forbidden(id));
        }
        let items = self.orders.items(id).await?;
        Ok(OrderDetail { order, items })
    }
}

fn log_total_mismatch(order_id: OrderId, client_total: Option<Decimal>, total: Price) {
    if let Some(client_total) = client_total
        && client_total != total.amount()
    {
        tracing::warn!(
            %order_id,
            %client_total,
            %total,
            "client total differs from catalog total"
        );
    }
}
