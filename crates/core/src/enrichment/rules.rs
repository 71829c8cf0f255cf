//! Sell/hold signal rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::SELL_RETURN_THRESHOLD_PCT;

/// Sell/hold signal attached to an enriched holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HoldingState {
    Sell,
    #[default]
    Hold,
}

/// Evaluates the sell/hold rules for a resolved price.
///
/// Fixed priority, first match wins: target reached, then total return over
/// the threshold, then stop-loss breached. Only one reason is ever reported
/// even if several conditions hold.
pub fn evaluate(
    current_price: Decimal,
    target: Option<Decimal>,
    stop_loss: Option<Decimal>,
    total_return_percent: Option<Decimal>,
) -> (HoldingState, String) {
    if let Some(target) = target {
        if current_price >= target {
            return (HoldingState::Sell, "Target Hit".to_string());
        }
    }
    if let Some(total_return) = total_return_percent {
        if total_return >= Decimal::from(SELL_RETURN_THRESHOLD_PCT) {
            return (HoldingState::Sell, "Returns > 30%".to_string());
        }
    }
    if let Some(stop_loss) = stop_loss {
        if current_price <= stop_loss {
            return (HoldingState::Sell, "Stop Loss Hit".to_string());
        }
    }
    (HoldingState::Hold, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_target_hit_wins_over_everything() {
        // Stop-loss would also fire on this input; target is checked first.
        let (state, reason) = evaluate(
            dec!(101),
            Some(dec!(100)),
            Some(dec!(150)),
            Some(dec!(45)),
        );
        assert_eq!(state, HoldingState::Sell);
        assert_eq!(reason, "Target Hit");
    }

    #[test]
    fn test_return_threshold_beats_stop_loss() {
        let (state, reason) = evaluate(dec!(131), None, Some(dec!(150)), Some(dec!(31)));
        assert_eq!(state, HoldingState::Sell);
        assert_eq!(reason, "Returns > 30%");
    }

    #[test]
    fn test_exact_threshold_sells() {
        let (state, reason) = evaluate(dec!(130), None, None, Some(dec!(30)));
        assert_eq!(state, HoldingState::Sell);
        assert_eq!(reason, "Returns > 30%");
    }

    #[test]
    fn test_stop_loss_hit() {
        let (state, reason) = evaluate(dec!(85), None, Some(dec!(90)), Some(dec!(-15)));
        assert_eq!(state, HoldingState::Sell);
        assert_eq!(reason, "Stop Loss Hit");
    }

    #[test]
    fn test_no_rule_matched_holds() {
        let (state, reason) = evaluate(dec!(105), Some(dec!(120)), Some(dec!(90)), Some(dec!(5)));
        assert_eq!(state, HoldingState::Hold);
        assert_eq!(reason, "");
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&HoldingState::Sell).unwrap(), "\"SELL\"");
        assert_eq!(serde_json::to_string(&HoldingState::Hold).unwrap(), "\"HOLD\"");
    }
}
