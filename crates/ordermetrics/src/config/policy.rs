use serde::{Deserialize, Serialize};

/// State id of a paid order under the strict rule.
pub const CONFIRMED_STATE_ID: i64 = 4;

/// State id of a cart that never reached payment.
pub const CART_STATE_ID: i64 = 1;

/// Which `stateId` values count as a confirmed order.
///
/// Exports produced over time disagree on this, so the rule is a deployment
/// setting. Rows whose state could not be read are never confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    /// `stateId == 4`
    StateConfirmed,
    /// `stateId != 1`
    #[default]
    StateNotCart,
}

impl ConfirmationPolicy {
    pub fn is_confirmed(self, state_id: Option<i64>) -> bool {
        match (self, state_id) {
            (_, None) => false,
            (ConfirmationPolicy::StateConfirmed, Some(state)) => state == CONFIRMED_STATE_ID,
            (ConfirmationPolicy::StateNotCart, Some(state)) => state != CART_STATE_ID,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ConfirmationPolicy::StateConfirmed => "stateId == 4",
            ConfirmationPolicy::StateNotCart => "stateId != 1",
        }
    }
}
