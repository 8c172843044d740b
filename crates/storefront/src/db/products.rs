//! Product repository for database operations.

use sqlx::{SqliteConnection, SqlitePool};

use apex_core::{Price, ProductId, Sizes};

use super::RepositoryError;
use crate::models::product::{Product, ProductInput};

const LIST_PRODUCTS: &str = "SELECT id, name, description, price, image, stock, sizes, featured FROM products ORDER BY id";
const GET_PRODUCT: &str = "SELECT id, name, description, price, image, stock, sizes, featured FROM products WHERE id = ?";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    image: String,
    stock: i64,
    sizes: Sizes,
    featured: bool,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {} has out-of-range stock {}",
                row.id, row.stock
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            stock,
            sizes: row.sizes,
            featured: row.featured,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(LIST_PRODUCTS)
            .fetch_all(self.pool)
            .await?;

        into_products(rows)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, price, image, stock, sizes, featured)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, price, image, stock, sizes, featured
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image)
        .bind(i64::from(input.stock))
        .bind(&input.sizes)
        .bind(input.featured)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace every field of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = ?, description = ?, price = ?, image = ?, stock = ?, sizes = ?, featured = ?
            WHERE id = ?
            RETURNING id, name, description, price, image, stock, sizes, featured
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image)
        .bind(i64::from(input.stock))
        .bind(&input.sizes)
        .bind(input.featured)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a product. Order lines that reference it are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Connection-level statements (usable inside a transaction)
// =============================================================================

/// Fetch one product on an existing connection.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_product(
    conn: &mut SqliteConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    sqlx::query_as::<_, ProductRow>(GET_PRODUCT)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .map(Product::try_from)
        .transpose()
}

/// Take `quantity` units out of stock if at least that many remain.
///
/// Returns `false`, changing nothing, when stock is insufficient or the
/// product does not exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: ProductId,
    quantity: u32,
) -> Result<bool, RepositoryError> {
    let quantity = i64::from(quantity);
    let result = sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?")
        .bind(quantity)
        .bind(id)
        .bind(quantity)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() == 1)
}
