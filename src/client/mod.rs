pub mod http;
pub mod query;

pub use http::*;
pub use query::*;
