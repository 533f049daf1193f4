//! Batch execution: bounded concurrent groups of HTTP requests.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RequestPool`] | Owns a batch and runs it once, group by group |
//! | [`PoolConfig`] | Group limit, per-request timeout, grouping policy, client options |
//! | [`GroupingPolicy`] | Chunked (ceiling division) or Legacy partitioning |
//! | [`ResponseList`] | Queryable results of a completed run |
//!
//! ## Execution model
//!
//! Requests are partitioned into groups by [`plan_groups`]. Every request in
//! a group runs on its own tokio task; the pool waits for the whole group to
//! finish before dispatching the next one. Timeouts and transport errors are
//! recorded as failed responses and never stop the batch.

mod config;
mod plan;
mod pool;
mod results;

pub use config::{GroupingPolicy, PoolConfig};
pub use plan::{group_count, plan_groups};
pub use pool::{PoolState, RequestPool};
pub use results::ResponseList;
