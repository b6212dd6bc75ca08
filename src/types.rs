// =============================================================================
// Shared types used across the FX signal board
// =============================================================================

use serde::{Deserialize, Serialize};

/// Direction of the latest close relative to its 20-period EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Discrete trading signal emitted for one currency pair.
///
/// `Fast` signals target a 1-minute horizon, `Slow` signals a 5-minute one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    BuyFast,
    BuySlow,
    SellFast,
    SellSlow,
    Wait,
    /// At least one required input of the latest row was undefined.
    InsufficientData,
}

impl Signal {
    /// Card label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BuyFast => "✅ Buy (1 min)",
            Self::BuySlow => "✅ Buy (5 min)",
            Self::SellFast => "❌ Sell (1 min)",
            Self::SellSlow => "❌ Sell (5 min)",
            Self::Wait => "🟡 Wait",
            Self::InsufficientData => "⏳ Insufficient data",
        }
    }

    /// Card background color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::BuyFast => "#00FF00",
            Self::BuySlow => "#32CD32",
            Self::SellFast => "#FF4500",
            Self::SellSlow => "#FF0000",
            Self::Wait => "#FFA500",
            Self::InsufficientData => "#A9A9A9",
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            Self::BuyFast | Self::BuySlow | Self::SellFast | Self::SellSlow
        )
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuyFast => write!(f, "BuyFast"),
            Self::BuySlow => write!(f, "BuySlow"),
            Self::SellFast => write!(f, "SellFast"),
            Self::SellSlow => write!(f, "SellSlow"),
            Self::Wait => write!(f, "Wait"),
            Self::InsufficientData => write!(f, "InsufficientData"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_signal_has_distinct_label() {
        let all = [
            Signal::BuyFast,
            Signal::BuySlow,
            Signal::SellFast,
            Signal::SellSlow,
            Signal::Wait,
            Signal::InsufficientData,
        ];
        let mut labels: Vec<&str> = all.iter().map(Signal::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), all.len());
    }

    #[test]
    fn colors_match_dashboard_palette() {
        assert_eq!(Signal::BuyFast.color(), "#00FF00");
        assert_eq!(Signal::BuySlow.color(), "#32CD32");
        assert_eq!(Signal::SellFast.color(), "#FF4500");
        assert_eq!(Signal::SellSlow.color(), "#FF0000");
        assert_eq!(Signal::Wait.color(), "#FFA500");
    }

    #[test]
    fn only_buy_and_sell_are_actionable() {
        assert!(Signal::BuyFast.is_actionable());
        assert!(Signal::SellSlow.is_actionable());
        assert!(!Signal::Wait.is_actionable());
        assert!(!Signal::InsufficientData.is_actionable());
    }

    #[test]
    fn signal_serialises_as_variant_name() {
        let json = serde_json::to_string(&Signal::SellFast).unwrap();
        assert_eq!(json, "\"SellFast\"");
    }
}
