//! Command-line layer: argument parsing, usage text, operation mode.

pub mod args;
pub mod help;
pub mod op_mode;

pub use args::{parse_args, parse_args_from, ParsedArgs};
pub use op_mode::OpMode;
