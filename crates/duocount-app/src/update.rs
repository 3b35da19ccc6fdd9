#![forbid(unsafe_code)]

//! Counter update requests.
//!
//! Hosts send untyped `{"type": ..., "quantity": ...}` objects; they are
//! parsed once at the boundary into [`CounterUpdate`]. Anything that does not
//! name a known update type parses to `None` and is dropped.

use serde::Deserialize;

pub const TYPE_INCREASE: &str = "increase";
pub const TYPE_DECREASE: &str = "decrease";

/// Request to move the counter. `quantity: None` means one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterUpdate {
    Increase { quantity: Option<u32> },
    Decrease { quantity: Option<u32> },
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    #[serde(rename = "type")]
    kind: Option<String>,
    quantity: Option<u32>,
}

impl CounterUpdate {
    pub const fn increase(quantity: u32) -> Self {
        Self::Increase {
            quantity: Some(quantity),
        }
    }

    pub const fn decrease(quantity: u32) -> Self {
        Self::Decrease {
            quantity: Some(quantity),
        }
    }

    /// Build from an update type name. Unknown names yield `None`.
    pub fn parse(kind: &str, quantity: Option<u32>) -> Option<Self> {
        match kind {
            TYPE_INCREASE => Some(Self::Increase { quantity }),
            TYPE_DECREASE => Some(Self::Decrease { quantity }),
            _ => None,
        }
    }

    /// Parse a JSON update object.
    ///
    /// Malformed JSON, a missing `type`, or a `quantity` that is not a `u32`
    /// all yield `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        let raw: RawUpdate = match serde_json::from_str(json) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(target: "duocount.app", error = %err, "malformed counter update");
                return None;
            }
        };
        let kind = raw.kind?;
        Self::parse(&kind, raw.quantity)
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Increase { .. } => TYPE_INCREASE,
            Self::Decrease { .. } => TYPE_DECREASE,
        }
    }

    /// Effective step size.
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Increase { quantity } | Self::Decrease { quantity } => quantity.unwrap_or(1),
        }
    }

    /// The counter after this update, saturating at the `i64` bounds.
    #[must_use]
    pub fn apply(&self, counter: i64) -> i64 {
        let step = i64::from(self.quantity());
        match self {
            Self::Increase { .. } => counter.saturating_add(step),
            Self::Decrease { .. } => counter.saturating_sub(step),
        }
    }
}
