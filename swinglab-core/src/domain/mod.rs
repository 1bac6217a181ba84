//! Domain types for SwingLab

pub mod bar;
pub mod position;
pub mod trade;

pub use bar::{is_strictly_ascending, Bar};
pub use position::OpenPosition;
pub use trade::{ExitReason, Trade, TradeSide};

/// Symbol type alias
pub type Symbol = String;
