pub mod changes;
pub mod commands;
pub mod error;
pub mod output;

pub use commands::*;
pub use output::*;
pub use error::*;
