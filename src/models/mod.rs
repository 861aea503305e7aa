// Core data models
// These structs represent the domain entities exchanged with the backend

pub mod project;
pub mod stage;
pub mod gantt;
pub mod change;

pub use project::*;
pub use stage::*;
pub use gantt::*;
pub use change::*;
