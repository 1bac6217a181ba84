//! Data collaborators: provider trait, Yahoo Finance, symbol lists,
//! synthetic bars.

pub mod provider;
pub mod symbols;
pub mod synthetic;
pub mod yahoo;

pub use provider::{
    canonicalize, BarProvider, DataError, FetchProgress, SilentProgress, StdoutProgress,
};
pub use symbols::{load_cboe_symbols, load_symbols, write_example_file};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
