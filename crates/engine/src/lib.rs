//! Pure rebalancing core: LTV math, the rebalance decision engine,
//! scenario chaining, and price projections.
//!
//! Everything here is a deterministic computation over immutable inputs,
//! with no I/O and no shared mutable state. Live price retrieval and
//! rendering are collaborators that call into this crate.

pub mod assessor;
pub mod ltv;
pub mod projection;
pub mod rebalance;
pub mod scenario;
