use serde::{Deserialize, Serialize};
use slidecast_config::{TierLimitOverrides, TierName};

/// Caller-selected rate-limit bracket
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Starter,
    Creator,
    Pro,
    Business,
    Enterprise,
}

impl Tier {
    pub const ALL: [Self; 6] = [
        Self::Free,
        Self::Starter,
        Self::Creator,
        Self::Pro,
        Self::Business,
        Self::Enterprise,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

impl From<TierName> for Tier {
    fn from(name: TierName) -> Self {
        match name {
            TierName::Free => Self::Free,
            TierName::Starter => Self::Starter,
            TierName::Creator => Self::Creator,
            TierName::Pro => Self::Pro,
            TierName::Business => Self::Business,
            TierName::Enterprise => Self::Enterprise,
        }
    }
}

/// Requests per window for each tier, `None` meaning unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    limits: [Option<u32>; 6],
}

impl Default for TierLimits {
    /// The `ElevenLabs` subscription table
    fn default() -> Self {
        Self {
            limits: [Some(2), Some(3), Some(5), Some(10), Some(15), None],
        }
    }
}

impl TierLimits {
    pub const fn limit(&self, tier: Tier) -> Option<u32> {
        self.limits[tier.index()]
    }

    /// Replace the entries that are set in `overrides`
    #[must_use]
    pub fn with_overrides(mut self, overrides: &TierLimitOverrides) -> Self {
        for (slot, value) in self.limits.iter_mut().zip(overrides.values()) {
            if value.is_some() {
                *slot = value;
            }
        }
        self
    }
}

/// How a limiter derives its ceiling from the request tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPolicy {
    /// Same limit regardless of tier
    Flat(u32),
    /// Limit looked up per tier
    Tiered(TierLimits),
}

impl LimitPolicy {
    pub const fn limit_for(&self, tier: Tier) -> Option<u32> {
        match self {
            Self::Flat(limit) => Some(*limit),
            Self::Tiered(limits) => limits.limit(tier),
        }
    }
}
