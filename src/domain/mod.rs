pub mod risk;
pub mod stats;
pub mod trade;

pub use risk::*;
pub use stats::*;
pub use trade::*;
