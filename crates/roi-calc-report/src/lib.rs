pub mod format;
pub mod reveal;
pub mod view;

pub use format::*;
pub use reveal::*;
pub use view::*;
