//! Trade records
//!
//! A trade is produced when an incoming (aggressor) order crosses a resting
//! (provider) order. The execution price is always the aggressor's limit
//! price, and `side` is always the aggressor's side.

use crate::ids::{AgentId, AssetId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which leg of a trade an agent is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Submitted the crossing order
    Aggressor,
    /// Owned the resting order that was consumed
    Provider,
}

/// Completed trade, append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Engine-wide monotonic sequence
    pub sequence: u64,
    /// Round the trade executed in (1-based)
    pub round: u64,
    pub aggressor: AgentId,
    /// Aggressor's side
    pub side: Side,
    pub provider: AgentId,
    pub size: Quantity,
    pub asset: AssetId,
    /// Aggressor's limit price
    pub price: Price,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        round: u64,
        aggressor: AgentId,
        side: Side,
        provider: AgentId,
        size: Quantity,
        asset: AssetId,
        price: Price,
    ) -> Self {
        Self {
            sequence,
            round,
            aggressor,
            side,
            provider,
            size,
            asset,
            price,
        }
    }

    /// Calculate trade value (price × size)
    pub fn value(&self) -> Decimal {
        self.size.notional(self.price)
    }

    pub fn involves(&self, agent: AgentId) -> bool {
        self.aggressor == agent || self.provider == agent
    }

    /// Role of `agent` in this trade; the aggressor leg wins for self-trades
    pub fn role_of(&self, agent: AgentId) -> Option<Role> {
        if self.aggressor == agent {
            Some(Role::Aggressor)
        } else if self.provider == agent {
            Some(Role::Provider)
        } else {
            None
        }
    }

    /// Side traded by the given leg
    pub fn side_for_role(&self, role: Role) -> Side {
        match role {
            Role::Aggressor => self.side,
            Role::Provider => self.side.opposite(),
        }
    }

    /// Side traded by `agent`, if it is a counterparty
    pub fn side_for(&self, agent: AgentId) -> Option<Side> {
        self.role_of(agent).map(|role| self.side_for_role(role))
    }

    pub fn is_self_trade(&self) -> bool {
        self.aggressor == self.provider
    }
}
