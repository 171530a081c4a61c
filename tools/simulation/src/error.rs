//! Simulator errors

use matching_engine::EngineError;
use thiserror::Error;
use types::ids::{AgentId, AssetId};

/// Errors raised while registering agents or running rounds
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Agent {name} is not bound to an asset")]
    UnboundAgent { name: String },

    #[error("Agent {name} is bound to {asset}, which is not simulated")]
    UnknownAsset { name: String, asset: AssetId },

    #[error("Unknown agent: {agent}")]
    UnknownAgent { agent: AgentId },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
