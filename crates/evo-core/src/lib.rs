//! Evolutionary cooperation simulation engine.
//!
//! A population of agents repeatedly plays a staked two-player
//! cooperation/defection game. Outcomes move balances, build directed
//! trust edges, and drive periodic selection: low performers are
//! culled, high performers reproduce. Adaptive agents replace their
//! fixed strategy with a learned 4-weight rule updated from observed
//! performance.
//!
//! The engine is deterministic given a seed: every stochastic
//! operation (pair shuffling, the Random policy, adaptive weight
//! initialization and mutation) draws from one seeded generator owned
//! by the [`Simulation`].
//!
//! # Modules
//!
//! - [`strategy`]: fixed decision policies, payoff matrix, histories
//! - [`agent`]: agent state and the adaptive decision rule
//! - [`trust`]: directed trust edges and their update rule
//! - [`commitment`]: resolution of one paired game
//! - [`simulation`]: the aggregate root and round scheduler
//! - [`selection`]: culling, reproduction, and the learning pass
//! - [`export`]: read-only views for external consumers
//! - [`events`]: JSONL persistence for the event log

pub mod agent;
pub mod commitment;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod selection;
pub mod simulation;
pub mod strategy;
pub mod trust;

pub use agent::{AdaptiveState, Agent, AgentId, ADAPTIVE_LABEL};
pub use commitment::Commitment;
pub use config::{ConfigError, SimConfig, StrategySet};
pub use error::SimError;
pub use events::EventLogger;
pub use selection::SelectionResult;
pub use simulation::{RoundResult, Simulation, StrategyTotals};
pub use strategy::{Action, InteractionHistory, StrategyKind};
pub use trust::{TrustEdge, TrustGraph};
