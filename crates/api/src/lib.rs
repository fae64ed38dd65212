//! Axum HTTP surface over the rebalancing core.
//!
//! Endpoints:
//! - GET  /health — service status
//! - GET  /api/prices/current — live quote from the price feed
//! - POST /api/loans/evaluate — single rebalance evaluation
//! - POST /api/loans/scenarios — originate a loan and run a what-if chain

pub mod routes;
pub mod state;
