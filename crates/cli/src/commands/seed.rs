//! Seed the storefront database with the default catalog and admin.
//!
//! Both steps are idempotent: the catalog is only loaded into an empty
//! products table, and the admin only when no admin account exists.

use apex_core::{Price, PriceError, Sizes, SizesError};
use apex_storefront::db::{ProductRepository, RepositoryError, UserRepository};
use apex_storefront::models::ProductInput;
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

use super::admin::{AdminError, insert_admin};

/// Email of the bootstrap admin account.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@apex.com";

const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// A built-in catalog entry is invalid.
    #[error("Invalid seed product {name}: {reason}")]
    InvalidProduct { name: &'static str, reason: String },

    /// Creating the admin failed.
    #[error(transparent)]
    Admin(#[from] AdminError),
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    /// Whole currency units.
    price: i64,
    image: &'static str,
    stock: u32,
    sizes: &'static [&'static str],
    featured: bool,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Apex Sneakers Air Max 270 React",
        description: "Classic comfort with a modern look. Clean white finish.",
        price: 3_200_000,
        image: "https://images.unsplash.com/photo-1551107696-a4b0c5a0d9a2?auto=format&fit=crop&q=80&w=800",
        stock: 50,
        sizes: &["39", "40", "41", "42", "43"],
        featured: true,
    },
    SeedProduct {
        name: "Apex Sneakers Air Max 90",
        description: "Standout retro style in a bold purple.",
        price: 3_500_000,
        image: "https://images.unsplash.com/photo-1608231387042-66d1773070a5?auto=format&fit=crop&q=80&w=800",
        stock: 30,
        sizes: &["40", "41", "42", "43", "44"],
        featured: true,
    },
    SeedProduct {
        name: "Apex Sneakers RS-X",
        description: "On-trend chunky silhouette in pink and white.",
        price: 2_800_000,
        image: "https://images.unsplash.com/photo-1606107557195-0e29a4b5b4aa?auto=format&fit=crop&q=80&w=800",
        stock: 100,
        sizes: &["36", "37", "38", "39", "40"],
        featured: true,
    },
    SeedProduct {
        name: "Apex Sneakers Legend Essential",
        description: "Versatile trainer with a minimal black and white design.",
        price: 2_200_000,
        image: "https://images.unsplash.com/photo-1491553895911-0055eca6402d?auto=format&fit=crop&q=80&w=800",
        stock: 20,
        sizes: &["39", "40", "41", "42"],
        featured: false,
    },
    SeedProduct {
        name: "Apex Sneakers Air Max 200",
        description: "Maximum air cushioning for a soft stride.",
        price: 3_000_000,
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?auto=format&fit=crop&q=80&w=800",
        stock: 40,
        sizes: &["38", "39", "40", "41", "42", "43"],
        featured: true,
    },
    SeedProduct {
        name: "Apex Sneakers Runner Pro",
        description: "Light and breathable for everyday runs.",
        price: 2_500_000,
        image: "https://images.unsplash.com/photo-1595950653106-6c9ebd614d3a?auto=format&fit=crop&q=80&w=800",
        stock: 60,
        sizes: &["39", "40", "41", "42", "43"],
        featured: false,
    },
    SeedProduct {
        name: "Apex Sneakers Shadow 5000",
        description: "Retro inspiration in premium materials.",
        price: 2_600_000,
        image: "https://images.unsplash.com/photo-1515955656352-a1fa3ffcd111?auto=format&fit=crop&q=80&w=800",
        stock: 25,
        sizes: &["39", "40", "41", "42"],
        featured: false,
    },
    SeedProduct {
        name: "Apex Sneakers Fragment 3",
        description: "Limited edition with a one-of-a-kind design.",
        price: 4_500_000,
        image: "https://images.unsplash.com/photo-1600185365926-3a2ce3cdb9eb?auto=format&fit=crop&q=80&w=800",
        stock: 10,
        sizes: &["40", "41", "42", "43"],
        featured: true,
    },
    SeedProduct {
        name: "Apex Sneakers Kyrie",
        description: "Pro basketball shoe with maximum support.",
        price: 3_800_000,
        image: "https://images.unsplash.com/photo-1579338559194-a162d19bf842?auto=format&fit=crop&q=80&w=800",
        stock: 15,
        sizes: &["41", "42", "43", "44"],
        featured: false,
    },
    SeedProduct {
        name: "Apex Sneakers Air Max 1",
        description: "The icon of the Air Max line in grey and white.",
        price: 3_100_000,
        image: "https://images.unsplash.com/photo-1525966222134-fcfa99b8ae77?auto=format&fit=crop&q=80&w=800",
        stock: 45,
        sizes: &["39", "40", "41", "42", "43"],
        featured: true,
    },
];

impl SeedProduct {
    fn to_input(&self) -> Result<ProductInput, SeedError> {
        let invalid = |reason: String| SeedError::InvalidProduct {
            name: self.name,
            reason,
        };

        Ok(ProductInput {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            price: Price::new(Decimal::from(self.price))
                .map_err(|e: PriceError| invalid(e.to_string()))?,
            image: self.image.to_owned(),
            stock: self.stock,
            sizes: Sizes::new(self.sizes.iter().copied())
                .map_err(|e: SizesError| invalid(e.to_string()))?,
            featured: self.featured,
        })
    }
}

/// Seed the database named by the environment.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run(admin_password: Option<&SecretString>) -> Result<(), SeedError> {
    let pool = super::connect().await?;

    let products = seed_catalog(&pool).await?;
    if products == 0 {
        tracing::info!("Catalog already populated, skipping products");
    } else {
        tracing::info!(products, "Catalog seeded");
    }

    match admin_password {
        Some(password) => {
            if seed_admin(&pool, password).await? {
                tracing::info!("Default admin {} created", DEFAULT_ADMIN_EMAIL);
            } else {
                tracing::info!("An admin already exists, skipping default admin");
            }
        }
        None => tracing::warn!(
            "No admin password supplied (--admin-password or APEX_ADMIN_PASSWORD), skipping default admin"
        ),
    }

    Ok(())
}

/// Insert the built-in catalog if the products table is empty.
///
/// Returns the number of products inserted.
pub(crate) async fn seed_catalog(pool: &SqlitePool) -> Result<usize, SeedError> {
    let products = ProductRepository::new(pool);
    if products.count().await? > 0 {
        return Ok(0);
    }

    for entry in CATALOG {
        products.create(&entry.to_input()?).await?;
    }
    Ok(CATALOG.len())
}

/// Create the default admin unless an admin already exists.
///
/// Returns whether an account was created.
pub(crate) async fn seed_admin(
    pool: &SqlitePool,
    password: &SecretString,
) -> Result<bool, SeedError> {
    if UserRepository::new(pool).count_admins().await? > 0 {
        return Ok(false);
    }
    insert_admin(pool, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, password).await?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apex_storefront::db::create_memory_pool;

    use super::*;

    #[test]
    fn test_catalog_entries_are_valid() {
        for entry in CATALOG {
            assert!(entry.to_input().is_ok(), "{} is invalid", entry.name);
        }
    }

    #[tokio::test]
    async fn test_seed_catalog_once() {
        let pool = create_memory_pool().await.unwrap();

        assert_eq!(seed_catalog(&pool).await.unwrap(), CATALOG.len());
        assert_eq!(seed_catalog(&pool).await.unwrap(), 0);

        let products = ProductRepository::new(&pool).list().await.unwrap();
        assert_eq!(products.len(), CATALOG.len());
        assert!(products.iter().any(|p| p.featured));
    }

    #[tokio::test]
    async fn test_seed_admin_once() {
        let pool = create_memory_pool().await.unwrap();
        let password = SecretString::from("hunter22");

        assert!(seed_admin(&pool, &password).await.unwrap());
        assert!(!seed_admin(&pool, &password).await.unwrap());
        assert_eq!(UserRepository::new(&pool).count_admins().await.unwrap(), 1);
    }
}
