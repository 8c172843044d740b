//! Order repository for database operations.
//!
//! Reads go through [`OrderRepository`]. The statements that create an
//! order take a `&mut SqliteConnection` so the order service can run them
//! inside one transaction together with the stock decrements.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use apex_core::{
    LineItem, OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, ShippingInfo,
    UserId,
};

use super::RepositoryError;
use crate::models::order::{Order, OrderItemDetail};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total: Price,
    status: OrderStatus,
    shipping_info: ShippingInfo,
    payment_method: PaymentMethod,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            total: row.total,
            status: row.status,
            shipping_info: row.shipping_info,
            payment_method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    product_id: ProductId,
    quantity: i64,
    size: String,
    price: Price,
    name: Option<String>,
    image: Option<String>,
}

impl TryFrom<OrderItemRow> for OrderItemDetail {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order item {} has out-of-range quantity {}",
                row.id, row.quantity
            ))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            quantity,
            size: row.size,
            price: row.price,
            name: row.name,
            image: row.image,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reading placed orders.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Every order, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, status, shipping_info, payment_method, created_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Orders owned by one user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, status, shipping_info, payment_method, created_at
            FROM orders
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, status, shipping_info, payment_method, created_at
            FROM orders
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Lines of an order with the referenced products' current name and image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.product_id, oi.quantity, oi.size, oi.price,
                   p.name AS name, p.image AS image
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?
            ORDER BY oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(OrderItemDetail::try_from)
        .collect()
    }
}

// =============================================================================
// Connection-level statements (usable inside a transaction)
// =============================================================================

/// Insert the order header.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_order(
    conn: &mut SqliteConnection,
    user_id: UserId,
    total: Price,
    shipping_info: &ShippingInfo,
    payment_method: PaymentMethod,
) -> Result<OrderId, RepositoryError> {
    let id: OrderId = sqlx::query_scalar(
        r"
        INSERT INTO orders (user_id, total, status, shipping_info, payment_method, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        ",
    )
    .bind(user_id)
    .bind(total)
    .bind(OrderStatus::default())
    .bind(shipping_info)
    .bind(payment_method)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Record one line at the given unit price.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line: &LineItem,
    unit_price: Price,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO order_items (order_id, product_id, quantity, size, price)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(order_id)
    .bind(line.product_id)
    .bind(i64::from(line.quantity))
    .bind(&line.size)
    .bind(unit_price)
    .execute(conn)
    .await?;

    Ok(())
}
