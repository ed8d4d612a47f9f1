//! Conversion funnel: selfie searches through to complete packages.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::EventCatalog;
use crate::normalizer::FunnelRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Selfies,
    UniqueUsers,
    CartUsers,
    Purchases,
    CompletePackages,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 5] = [
        FunnelStage::Selfies,
        FunnelStage::UniqueUsers,
        FunnelStage::CartUsers,
        FunnelStage::Purchases,
        FunnelStage::CompletePackages,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FunnelStage::Selfies => "Selfies",
            FunnelStage::UniqueUsers => "Unique Users",
            FunnelStage::CartUsers => "Cart Users",
            FunnelStage::Purchases => "Purchases",
            FunnelStage::CompletePackages => "Complete Packages",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoStage {
    pub stage: FunnelStage,
    pub value: u64,
    /// Stage value as a percentage of the first stage.
    pub cumulative_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelMetrics {
    pub selfies_count: u64,
    pub unique_users: u64,
    pub cart_users_count: u64,
    pub purchases_count: u64,
    pub complete_packages: u64,
    pub conversion_rate: f64,
    pub user_value: f64,
    pub pareto: Vec<ParetoStage>,
}

impl FunnelMetrics {
    pub fn stage_value(&self, stage: FunnelStage) -> u64 {
        match stage {
            FunnelStage::Selfies => self.selfies_count,
            FunnelStage::UniqueUsers => self.unique_users,
            FunnelStage::CartUsers => self.cart_users_count,
            FunnelStage::Purchases => self.purchases_count,
            FunnelStage::CompletePackages => self.complete_packages,
        }
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Funnel records for the events present in the filtered orders.
pub fn matching_records<'a>(
    records: &'a [FunnelRecord],
    event_ids: &BTreeSet<i64>,
) -> Vec<&'a FunnelRecord> {
    records
        .iter()
        .filter(|r| r.event_id.is_some_and(|id| event_ids.contains(&id)))
        .collect()
}

/// Sums the funnel counts and derives conversion, user value and the pareto
/// series. Every ratio falls back to zero on an empty denominator.
///
/// Counts saturate at `u64::MAX` instead of overflowing.
pub fn funnel_metrics(records: &[&FunnelRecord], total_amount: f64) -> FunnelMetrics {
    let sum = |f: fn(&FunnelRecord) -> u64| {
        records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(f(*r)))
    };

    let mut metrics = FunnelMetrics {
        selfies_count: sum(|r| r.total_users_count),
        unique_users: sum(|r| r.unique_users_count),
        cart_users_count: sum(|r| r.total_orders_users),
        purchases_count: sum(|r| r.total_orders),
        complete_packages: sum(|r| r.total_allphotos),
        conversion_rate: 0.0,
        user_value: 0.0,
        pareto: Vec::new(),
    };

    let unique = metrics.unique_users as f64;
    metrics.conversion_rate = ratio_or_zero(metrics.purchases_count as f64, unique) * 100.0;
    metrics.user_value = ratio_or_zero(total_amount, unique);

    let base = metrics.selfies_count as f64;
    metrics.pareto = FunnelStage::ALL
        .iter()
        .map(|stage| {
            let value = metrics.stage_value(*stage);
            ParetoStage {
                stage: *stage,
                value,
                cumulative_pct: ratio_or_zero(value as f64, base) * 100.0,
            }
        })
        .collect();

    metrics
}

/// Summed `unique_users_count` per event name.
pub fn unique_users_by_event(
    records: &[&FunnelRecord],
    catalog: &EventCatalog,
) -> BTreeMap<String, u64> {
    let mut users: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        if let Some(id) = record.event_id {
            let count = users.entry(catalog.name_for(id)).or_default();
            *count = count.saturating_add(record.unique_users_count);
        }
    }
    users
}
