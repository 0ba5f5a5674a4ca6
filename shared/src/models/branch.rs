//! Branch Model

use serde::{Deserialize, Serialize};

/// Branch (physical location) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub is_active: bool,
}

/// Create branch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCreate {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

/// Update branch payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
