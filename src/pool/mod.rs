//! Bounded-concurrency tile compute pool.
//!
//! A fixed set of worker threads serves tile jobs; overflow waits in a
//! FIFO queue. The computation itself sits behind the [`TileComputer`]
//! port so scheduling can be tested with stub computers.

pub mod escape_time_computer;
pub mod ports;
pub mod worker_pool;

pub use escape_time_computer::EscapeTimeComputer;
pub use ports::TileComputer;
pub use worker_pool::{DEFAULT_POOL_SIZE, PendingTile, WorkerPool, WorkerPoolError};
