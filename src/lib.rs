#![doc = include_str!("../README.md")]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod error;
pub use error::{Error, Result};

mod frame;
pub use frame::{CLOSE, Cell, Frame};

mod returns;
pub use returns::{DAILY_RETURNS, ReturnSeries, compute_returns};

mod volatility;
pub use volatility::{
    Scale, TRADING_DAYS_PER_YEAR, VolatilityEngine, VolatilityResult, annualize, sample_stddev,
};

mod ingest;
pub use ingest::{read_csv_path, read_csv_reader};
