//! Analytics engines over collected price series
//!
//! Every function here is pure: prices in, numbers out. Orchestration and
//! presentation rounding live in [`metrics`].

pub mod correlation;
pub mod metrics;
pub mod momentum;
pub mod returns;
pub mod risk;
pub mod rolling;
pub mod statistics;

pub use correlation::{align, correlate, correlation_matrix, CorrelationMap};
pub use metrics::{sharpe_ratio, CurrencyMetrics, MetricsAssembler, RollingWindowMetrics};
pub use momentum::{momentum, sma, z_score};
pub use returns::{
    annualized_return, cumulative_return, log_returns, simple_return_series, simple_returns,
};
pub use risk::{historical_var, max_drawdown, parametric_var};
pub use rolling::{
    sliding_windows, trailing_window, trailing_windows, DateWindow, TrailingWindow,
    WindowStatistics,
};
pub use statistics::{mean, pearson_correlation, population_std_dev, population_variance};
