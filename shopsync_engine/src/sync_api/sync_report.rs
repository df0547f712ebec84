use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::sync_api::errors::StageFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStage {
    Products,
    Customers,
    Orders,
}

impl SyncStage {
    /// The order in which a full sync runs. Orders come last so that their customer and product references can be
    /// resolved.
    pub const ALL: [SyncStage; 3] = [SyncStage::Products, SyncStage::Customers, SyncStage::Orders];
}

impl Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStage::Products => f.write_str("products"),
            SyncStage::Customers => f.write_str("customers"),
            SyncStage::Orders => f.write_str("orders"),
        }
    }
}

/// What a bulk sync request asks for: one resource kind, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Stage(SyncStage),
    All,
}

impl FromStr for SyncTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "products" => Ok(Self::Stage(SyncStage::Products)),
            "customer" | "customers" => Ok(Self::Stage(SyncStage::Customers)),
            "order" | "orders" => Ok(Self::Stage(SyncStage::Orders)),
            "all" => Ok(Self::All),
            other => Err(format!("Unknown sync target '{other}'. Expected product, customer, order or all.")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounts {
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub line_items: usize,
    /// Line items that were not stored because their product is unknown locally.
    pub dropped_line_items: usize,
    /// Orders that name a customer who is unknown locally, and were stored without a customer link.
    pub unlinked_orders: usize,
}

/// The result contract of a bulk sync, as returned to whoever triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    pub counts: SyncCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<SyncStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<SyncCounts, StageFailure>> for SyncReport {
    fn from(result: Result<SyncCounts, StageFailure>) -> Self {
        match result {
            Ok(counts) => Self { success: true, counts, stage: None, error: None },
            Err(failure) => Self {
                success: false,
                counts: failure.counts,
                stage: failure.stage,
                error: Some(failure.source.to_string()),
            },
        }
    }
}
