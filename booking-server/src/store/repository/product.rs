//! Product Repository

use shared::error::ErrorCode;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::store::{RepoError, RepoResult, Store};

/// Find all products ordered by name
pub async fn find_all(store: &Store, include_inactive: bool) -> Vec<Product> {
    let mut products = store
        .products
        .filter(|p| include_inactive || p.is_active)
        .await;
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
}

/// Active products at or below their minimum stock
pub async fn find_low_stock(store: &Store) -> Vec<Product> {
    let mut products = store
        .products
        .filter(|p| p.is_active && p.is_low_stock())
        .await;
    products.sort_by_key(|p| p.stock);
    products
}

/// Create a new product
pub async fn create(store: &Store, data: ProductCreate) -> RepoResult<Product> {
    if store.products.any(|p| p.name == data.name).await {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Product '{}' already exists", data.name),
        ));
    }
    if data.stock < 0 || data.min_stock < 0 {
        return Err(RepoError::Validation(
            "stock and min_stock must not be negative".to_string(),
        ));
    }

    let product = Product {
        id: shared::util::snowflake_id(),
        name: data.name,
        description: data.description,
        price: data.price,
        stock: data.stock,
        min_stock: data.min_stock,
        is_active: true,
    };
    store.products.insert(product).await
}

/// Update a product, returning `(before, after)`
pub async fn update(
    store: &Store,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<(Product, Product)> {
    let existing = store.products.require(id).await?;

    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && store.products.any(|p| &p.name == new_name).await
    {
        return Err(RepoError::duplicate(
            ErrorCode::AlreadyExists,
            format!("Product '{}' already exists", new_name),
        ));
    }

    let updated = store
        .products
        .modify(id, |p| {
            if let Some(name) = data.name {
                p.name = name;
            }
            if data.description.is_some() {
                p.description = data.description;
            }
            if let Some(price) = data.price {
                p.price = price;
            }
            if let Some(min_stock) = data.min_stock {
                if min_stock < 0 {
                    return Err(RepoError::Validation(
                        "min_stock must not be negative".to_string(),
                    ));
                }
                p.min_stock = min_stock;
            }
            if let Some(is_active) = data.is_active {
                p.is_active = is_active;
            }
            Ok(())
        })
        .await?;
    Ok((existing, updated))
}

/// Apply a stock delta; the result must stay >= 0
pub async fn adjust_stock(store: &Store, id: i64, delta: i32) -> RepoResult<Product> {
    store
        .products
        .modify(id, |p| {
            let next = p.stock.checked_add(delta).filter(|s| *s >= 0).ok_or_else(|| {
                RepoError::conflict(
                    ErrorCode::InsufficientStock,
                    format!("Stock {} cannot be adjusted by {}", p.stock, delta),
                )
            })?;
            p.stock = next;
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn seeded() -> (Store, Product) {
        let store = Store::new();
        let product = create(
            &store,
            ProductCreate {
                name: "Shampoo".to_string(),
                description: None,
                price: dec!(14.00),
                stock: 3,
                min_stock: 2,
            },
        )
        .await
        .unwrap();
        (store, product)
    }

    #[tokio::test]
    async fn stock_never_goes_negative() {
        let (store, product) = seeded().await;
        assert_eq!(adjust_stock(&store, product.id, -3).await.unwrap().stock, 0);
        let err = adjust_stock(&store, product.id, -1).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict { code: ErrorCode::InsufficientStock, .. }));
        assert_eq!(store.products.get(product.id).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn low_stock_listing() {
        let (store, product) = seeded().await;
        assert!(find_low_stock(&store).await.is_empty());
        adjust_stock(&store, product.id, -1).await.unwrap();
        assert_eq!(find_low_stock(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_names_rejected() {
        let (store, _) = seeded().await;
        let err = create(
            &store,
            ProductCreate {
                name: "Shampoo".to_string(),
                description: None,
                price: dec!(1),
                stock: 0,
                min_stock: 0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { .. }));
    }
}
