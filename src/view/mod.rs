pub mod route;
pub mod state;
pub mod timeline;

pub use route::*;
pub use state::*;
pub use timeline::*;
