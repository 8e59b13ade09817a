pub mod branches;
pub mod cleanup;
pub mod hosting;
pub mod outcome;
pub mod pull_request;
pub mod repo;
pub mod status;

// Re-exports for convenience
pub use branches::*;
pub use cleanup::*;
pub use hosting::*;
pub use outcome::*;
pub use pull_request::*;
pub use repo::*;
pub use status::*;
