pub mod console;

pub use console::{Command, HELP, handle, parse_command};
