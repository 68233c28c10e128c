pub mod history;
pub mod prize;
pub mod spin;

pub use history::*;
pub use prize::*;
pub use spin::*;
