pub mod calculator;
pub mod constants;
pub mod methodology;

pub use calculator::*;
pub use constants::*;
pub use methodology::*;
