//! Subscription profile as seen by callers that gate features.
//!
//! The finance core never consults this itself; front ends decide what to gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "mensal", alias = "monthly")]
    Monthly,
    #[serde(rename = "anual", alias = "annual", alias = "yearly")]
    Annual,
}

impl Plan {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Plan::Free),
            "mensal" | "monthly" => Some(Plan::Monthly),
            "anual" | "annual" | "yearly" => Some(Plan::Annual),
            _ => None,
        }
    }

    /// Stored name: `free`, `mensal` or `anual`.
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Monthly => "mensal",
            Plan::Annual => "anual",
        }
    }

    pub fn is_paid(self) -> bool {
        !matches!(self, Plan::Free)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub plan: Plan,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
}

impl Profile {
    /// A paid plan whose expiration lies after `now`. Missing expiration means inactive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.plan.is_paid() && self.expiration.is_some_and(|expires| expires > now)
    }
}

pub trait ProfileProvider {
    fn profile(&self) -> Option<Profile>;

    fn has_active_entitlement(&self, now: DateTime<Utc>) -> bool {
        self.profile().is_some_and(|profile| profile.is_active(now))
    }
}
