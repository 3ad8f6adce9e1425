//! Ebbtide Runner — everything around the strategy engine: the replay
//! driver with its simulated exchange, the live polling loop, metrics,
//! and run artifacts.
//!
//! The engine in `ebbtide-core` never does I/O; this crate supplies the
//! candles, balances and execution venues on both sides of that line.

pub mod config;
pub mod data;
pub mod exec;
pub mod live;
pub mod metrics;
pub mod replay;
pub mod report;
pub mod result;
pub mod sim;

pub use config::{RunConfig, RunConfigError, RunId};
pub use data::{load_candles_csv, synthetic_candles, write_candles_csv, DataError, SynthParams};
pub use exec::{BalanceSource, CandleFeed, Clock, ExecutionAdapter, FeedError, SystemClock};
pub use live::{InstantClock, LiveLoop, LiveSummary, ReplayFeed};
pub use metrics::{MonthlyReturn, PerformanceSummary};
pub use replay::{run_replay, ReplayError};
pub use report::{save_artifacts, RunManifest};
pub use result::{EquityPoint, ReplayResult, TradeRecord, SCHEMA_VERSION};
pub use sim::SimExchange;
