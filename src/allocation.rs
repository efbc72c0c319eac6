//! Risk-tiered budget allocation.
//!
//! Pure arithmetic: a total budget is split into trading and savings, and the
//! trading part into four tiers whose weights depend on the risk profile. The
//! spot tier is further divided across three assets.
//!
//! Products are formed as `amount * pct / 100` rather than `amount * (pct / 100)`
//! so round inputs stay exact in binary floating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Low-leverage positions may be opened at up to this multiple of the tier.
pub const LOW_LEVERAGE_MULTIPLIER: f64 = 5.0;
pub const HIGH_LEVERAGE_MULTIPLIER: f64 = 10.0;

/// (symbol, share of the spot tier in percent)
pub const SPOT_SPLIT: [(&str, f64); 3] = [("BTC", 40.0), ("ETH", 40.0), ("SOL", 20.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskProfile {
    Low,
    #[default]
    Medium,
    High,
}

/// Percent of the trading budget per tier. Each row sums to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierWeights {
    pub spot: f64,
    pub low_leverage: f64,
    pub high_leverage: f64,
    pub reserve: f64,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [RiskProfile::Low, RiskProfile::Medium, RiskProfile::High];

    pub fn weights(self) -> TierWeights {
        match self {
            RiskProfile::Low => TierWeights {
                spot: 70.0,
                low_leverage: 15.0,
                high_leverage: 5.0,
                reserve: 10.0,
            },
            RiskProfile::Medium => TierWeights {
                spot: 60.0,
                low_leverage: 25.0,
                high_leverage: 5.0,
                reserve: 10.0,
            },
            RiskProfile::High => TierWeights {
                spot: 50.0,
                low_leverage: 30.0,
                high_leverage: 10.0,
                reserve: 10.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskProfile::Low => "low",
            RiskProfile::Medium => "medium",
            RiskProfile::High => "high",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskProfile::Low),
            "medium" => Ok(RiskProfile::Medium),
            "high" => Ok(RiskProfile::High),
            _ => Err(InputError::UnknownRiskProfile(s.to_string())),
        }
    }
}

impl TryFrom<String> for RiskProfile {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAllocation {
    pub amount: f64,
    pub percent_of_trading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub symbol: String,
    pub share_percent: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBreakdown {
    pub total_budget: f64,
    pub trading_percent: f64,
    pub savings_percent: f64,
    pub trading_budget: f64,
    pub savings_budget: f64,
    pub spot: TierAllocation,
    pub low_leverage: TierAllocation,
    pub high_leverage: TierAllocation,
    pub reserve: TierAllocation,
    pub spot_assets: Vec<AssetAllocation>,
    pub low_leverage_max_position: f64,
    pub high_leverage_max_position: f64,
    pub risk_profile: RiskProfile,
}

fn share(amount: f64, pct: f64) -> f64 {
    amount * pct / 100.0
}

fn tier(trading: f64, pct: f64) -> TierAllocation {
    TierAllocation {
        amount: share(trading, pct),
        percent_of_trading: pct,
    }
}

/// No range checks here; see [`AllocationRequest::validate`].
pub fn allocate(total_budget: f64, trading_percent: f64, profile: RiskProfile) -> AllocationBreakdown {
    let trading_budget = share(total_budget, trading_percent);
    let savings_budget = total_budget - trading_budget;
    let w = profile.weights();

    let spot = tier(trading_budget, w.spot);
    let low_leverage = tier(trading_budget, w.low_leverage);
    let high_leverage = tier(trading_budget, w.high_leverage);
    let reserve = tier(trading_budget, w.reserve);

    let spot_assets = SPOT_SPLIT
        .iter()
        .map(|(symbol, pct)| AssetAllocation {
            symbol: symbol.to_string(),
            share_percent: *pct,
            amount: share(spot.amount, *pct),
        })
        .collect();

    AllocationBreakdown {
        total_budget,
        trading_percent,
        savings_percent: 100.0 - trading_percent,
        trading_budget,
        savings_budget,
        spot,
        low_leverage,
        high_leverage,
        reserve,
        spot_assets,
        low_leverage_max_position: low_leverage.amount * LOW_LEVERAGE_MULTIPLIER,
        high_leverage_max_position: high_leverage.amount * HIGH_LEVERAGE_MULTIPLIER,
        risk_profile: profile,
    }
}

/// Body of `POST /allocate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub total_budget: f64,
    pub trading_percent: f64,
    #[serde(default)]
    pub risk_profile: RiskProfile,
}

impl AllocationRequest {
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.total_budget.is_finite() && self.total_budget > 0.0) {
            return Err(InputError::NonPositiveBudget(self.total_budget));
        }
        if !(0.0..=100.0).contains(&self.trading_percent) {
            return Err(InputError::TradingPercentOutOfRange(self.trading_percent));
        }
        Ok(())
    }

    pub fn allocate(&self) -> Result<AllocationBreakdown, InputError> {
        self.validate()?;
        Ok(allocate(self.total_budget, self.trading_percent, self.risk_profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn medium_profile_on_round_numbers_is_exact() {
        let b = allocate(1000.0, 30.0, RiskProfile::Medium);
        assert_eq!(b.trading_budget, 300.0);
        assert_eq!(b.savings_budget, 700.0);
        assert_eq!(b.savings_percent, 70.0);
        assert_eq!(b.spot.amount, 180.0);
        assert_eq!(b.low_leverage.amount, 75.0);
        assert_eq!(b.high_leverage.amount, 15.0);
        assert_eq!(b.reserve.amount, 30.0);
        let split: Vec<f64> = b.spot_assets.iter().map(|a| a.amount).collect();
        assert_eq!(split, vec![72.0, 72.0, 36.0]);
        assert_eq!(b.low_leverage_max_position, 375.0);
        assert_eq!(b.high_leverage_max_position, 150.0);
    }

    #[test]
    fn tier_weights_sum_to_hundred() {
        for p in RiskProfile::ALL {
            let w = p.weights();
            assert_eq!(w.spot + w.low_leverage + w.high_leverage + w.reserve, 100.0, "{p}");
        }
    }

    #[test]
    fn parts_always_sum_to_whole() {
        let budgets = [0.0, 0.01, 1.0, 333.33, 1000.0, 12_345.67, 1e9];
        let percents = [0.0, 1.0, 12.5, 33.3, 50.0, 99.9, 100.0];
        for total in budgets {
            for pct in percents {
                for p in RiskProfile::ALL {
                    let b = allocate(total, pct, p);
                    assert!(close(b.trading_budget + b.savings_budget, total));
                    let tiers = b.spot.amount
                        + b.low_leverage.amount
                        + b.high_leverage.amount
                        + b.reserve.amount;
                    assert!(close(tiers, b.trading_budget), "{total} {pct} {p}");
                    let spot: f64 = b.spot_assets.iter().map(|a| a.amount).sum();
                    assert!(close(spot, b.spot.amount));
                }
            }
        }
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<RiskProfile>().unwrap(), RiskProfile::High);
        assert_eq!(" Low ".parse::<RiskProfile>().unwrap(), RiskProfile::Low);
        assert!(matches!(
            "yolo".parse::<RiskProfile>(),
            Err(InputError::UnknownRiskProfile(_))
        ));
        assert_eq!(RiskProfile::default(), RiskProfile::Medium);
    }

    #[test]
    fn request_json_and_validation() {
        let req: AllocationRequest =
            serde_json::from_str(r#"{"totalBudget": 500, "tradingPercent": 40, "riskProfile": "High"}"#)
                .unwrap();
        assert_eq!(req.risk_profile, RiskProfile::High);
        assert!(req.validate().is_ok());

        let req: AllocationRequest =
            serde_json::from_str(r#"{"totalBudget": 500, "tradingPercent": 40}"#).unwrap();
        assert_eq!(req.risk_profile, RiskProfile::Medium);

        let bad = AllocationRequest {
            total_budget: 0.0,
            trading_percent: 10.0,
            risk_profile: RiskProfile::Low,
        };
        assert_eq!(bad.validate(), Err(InputError::NonPositiveBudget(0.0)));

        let bad = AllocationRequest {
            total_budget: 10.0,
            trading_percent: 100.5,
            risk_profile: RiskProfile::Low,
        };
        assert!(matches!(bad.allocate(), Err(InputError::TradingPercentOutOfRange(_))));
    }

    #[test]
    fn breakdown_serializes_camel_case() {
        let v = serde_json::to_value(allocate(1000.0, 30.0, RiskProfile::Low)).unwrap();
        assert_eq!(v["riskProfile"], "low");
        assert_eq!(v["spot"]["percentOfTrading"], 70.0);
        assert_eq!(v["spotAssets"][2]["symbol"], "SOL");
        assert!(v.get("lowLeverageMaxPosition").is_some());
    }
}
