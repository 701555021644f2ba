pub mod errors;

pub use errors::{ConfigError, Error, FormatError, ParseError, Result};
