// Local state: SQLite file next to the client config

pub mod connection;
pub mod migrations;
pub mod preferences;
pub mod pending;

pub use connection::*;
pub use preferences::*;
pub use pending::*;
