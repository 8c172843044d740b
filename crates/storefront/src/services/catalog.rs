//! Catalog service: product reads for everyone, writes for admins.
//!
//! Authorization happens at the route layer; this service trusts its caller.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use apex_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::{Product, ProductInput};

/// Maximum product name length, in characters.
const MAX_NAME_LENGTH: usize = 200;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has this ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The product payload failed validation.
    #[error("{0}")]
    Invalid(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the payload fails validation.
    #[instrument(skip_all, fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let input = validate(input)?;
        let product = self.products.create(&input).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the payload fails validation.
    /// Returns `CatalogError::NotFound` if no product has this ID.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, CatalogError> {
        let input = validate(input)?;
        let product = self
            .products
            .update(id, &input)
            .await
            .map_err(|e| not_found_as(e, id))?;
        tracing::info!("product updated");
        Ok(product)
    }

    /// Remove a product. Past orders keep their lines.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        self.products
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, id))?;
        tracing::info!("product deleted");
        Ok(())
    }
}

fn not_found_as(err: RepositoryError, id: ProductId) -> CatalogError {
    match err {
        RepositoryError::NotFound => CatalogError::NotFound(id),
        other => CatalogError::Repository(other),
    }
}

/// Check the fields serde cannot, returning the input with text trimmed.
fn validate(mut input: ProductInput) -> Result<ProductInput, CatalogError> {
    input.name = input.name.trim().to_owned();
    if input.name.is_empty() {
        return Err(CatalogError::Invalid("product name cannot be empty".to_owned()));
    }
    if input.name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::Invalid(format!(
            "product name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    input.description = input.description.trim().to_owned();
    input.image = input.image.trim().to_owned();
    Ok(input)
}
