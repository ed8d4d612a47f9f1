use serde::Serialize;

pub const FUNNEL_EVENT_ID: &str = "event_id";
pub const TOTAL_USERS_COUNT: &str = "total_users_count";
pub const UNIQUE_USERS_COUNT: &str = "unique_users_count";
pub const TOTAL_ORDERS_USERS: &str = "total_orders_users";
pub const TOTAL_ORDERS: &str = "total_orders";
pub const TOTAL_ALLPHOTOS: &str = "total_allphotos";

pub const REQUIRED_FUNNEL_COLUMNS: &[&str] = &[
    FUNNEL_EVENT_ID,
    TOTAL_USERS_COUNT,
    UNIQUE_USERS_COUNT,
    TOTAL_ORDERS_USERS,
    TOTAL_ORDERS,
    TOTAL_ALLPHOTOS,
];

/// Pre-aggregated search/funnel counts for one event and time slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelRecord {
    pub event_id: Option<i64>,
    /// Selfie searches (impressions).
    pub total_users_count: u64,
    pub unique_users_count: u64,
    /// Distinct users that reached the cart.
    pub total_orders_users: u64,
    pub total_orders: u64,
    /// Complete photo packages sold.
    pub total_allphotos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunnelTable {
    pub records: Vec<FunnelRecord>,
}

impl FunnelTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Count cell; blanks and junk read as zero, fractional counts round.
/// Counts beyond `u64::MAX` clamp to it.
pub(crate) fn parse_count(value: &str) -> u64 {
    if let Ok(v) = value.parse::<u64>() {
        return v;
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("120"), 120);
        assert_eq!(parse_count("120.0"), 120);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("1e30"), u64::MAX);
        assert_eq!(parse_count("18446744073709551616"), u64::MAX);
    }
}
