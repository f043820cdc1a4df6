//! Premium membership plans offered by the client.
//!
//! Amounts are in minor currency units (paise), which is what the payment
//! order endpoint expects.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipPlan {
    Silver,
    Gold,
    Platinum,
}

impl MembershipPlan {
    /// All plans in display order
    pub const ALL: [MembershipPlan; 3] = [
        MembershipPlan::Silver,
        MembershipPlan::Gold,
        MembershipPlan::Platinum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MembershipPlan::Silver => "Silver",
            MembershipPlan::Gold => "Gold",
            MembershipPlan::Platinum => "Platinum",
        }
    }

    /// Value sent as `membershipType` when creating a payment order
    pub fn membership_type(self) -> &'static str {
        match self {
            MembershipPlan::Silver => "SILVER",
            MembershipPlan::Gold => "GOLD",
            MembershipPlan::Platinum => "PLATINUM",
        }
    }

    /// Price in minor units
    pub fn amount(self) -> u64 {
        match self {
            MembershipPlan::Silver => 5000,
            MembershipPlan::Gold => 10000,
            MembershipPlan::Platinum => 15000,
        }
    }

    pub fn price_label(self) -> &'static str {
        match self {
            MembershipPlan::Silver => "₹500",
            MembershipPlan::Gold => "₹1000",
            MembershipPlan::Platinum => "₹1500",
        }
    }

    pub fn period(self) -> &'static str {
        "per month"
    }

    pub fn description(self) -> &'static str {
        match self {
            MembershipPlan::Silver => "Great to get started and explore the network.",
            MembershipPlan::Gold => "Perfect balance of visibility and features.",
            MembershipPlan::Platinum => "Maximize your reach with premium visibility.",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            MembershipPlan::Silver => "Starter",
            MembershipPlan::Gold => "Most popular",
            MembershipPlan::Platinum => "For power users",
        }
    }

    pub fn highlighted(self) -> bool {
        matches!(self, MembershipPlan::Gold)
    }

    pub fn features(self) -> &'static [&'static str] {
        match self {
            MembershipPlan::Silver => &[
                "Chat with other people",
                "100 connection requests per month",
                "Basic profile visibility",
                "Limited search filters",
                "Standard support",
            ],
            MembershipPlan::Gold => &[
                "Everything in Silver",
                "Priority profile visibility",
                "Advanced search filters",
                "500 connection requests per month",
                "Priority support",
            ],
            MembershipPlan::Platinum => &[
                "Everything in Gold",
                "Top profile visibility",
                "All search filters unlocked",
                "1000 connection requests per month",
                "Dedicated premium support",
            ],
        }
    }
}

impl fmt::Display for MembershipPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MembershipPlan {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MembershipPlan::ALL
            .into_iter()
            .find(|plan| plan.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::InvalidValue {
                field: "plan".to_string(),
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parse_is_case_insensitive() {
        assert_eq!("gold".parse::<MembershipPlan>().unwrap(), MembershipPlan::Gold);
        assert_eq!(" PLATINUM ".parse::<MembershipPlan>().unwrap(), MembershipPlan::Platinum);
        assert!("bronze".parse::<MembershipPlan>().is_err());
    }

    #[test]
    fn test_only_gold_is_highlighted() {
        let highlighted: Vec<_> = MembershipPlan::ALL
            .into_iter()
            .filter(|p| p.highlighted())
            .collect();
        assert_eq!(highlighted, vec![MembershipPlan::Gold]);
    }

    #[test]
    fn test_amounts_increase_with_tier() {
        let amounts: Vec<u64> = MembershipPlan::ALL.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![5000, 10000, 15000]);
        assert_eq!(MembershipPlan::Silver.membership_type(), "SILVER");
    }
}
