//! Product Model (retail stock)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    /// Stock at or below this level is reported as low
    pub min_stock: i32,
    pub is_active: bool,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub min_stock: i32,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub min_stock: Option<i32>,
    pub is_active: Option<bool>,
}

/// Stock adjustment payload (positive = restock, negative = sale/usage)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub delta: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn low_stock_includes_the_threshold() {
        let mut product = Product {
            id: 1,
            name: "Argan oil".into(),
            description: None,
            price: dec!(12.50),
            stock: 3,
            min_stock: 3,
            is_active: true,
        };
        assert!(product.is_low_stock());
        product.stock = 4;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn price_accepts_numbers_and_strings() {
        let create: ProductCreate =
            serde_json::from_str(r#"{"name":"Wax","description":null,"price":"7.90"}"#).unwrap();
        assert_eq!(create.price, dec!(7.90));
        assert_eq!(create.stock, 0);
        let create: ProductCreate =
            serde_json::from_str(r#"{"name":"Wax","description":null,"price":8}"#).unwrap();
        assert_eq!(create.price, dec!(8));
    }
}
