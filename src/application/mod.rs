pub mod backtester;

pub use backtester::{Backtester, BacktesterError, BacktestReport};
