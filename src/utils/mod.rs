pub mod color;
pub mod currency;
pub mod weights;

pub use color::validate_hex_color;
pub use currency::format_currency;
pub use weights::*;
