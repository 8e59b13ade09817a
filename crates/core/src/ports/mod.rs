pub mod discovery;
pub mod hosting;
pub mod persistence;
pub mod reporter;
pub mod time;

// Re-exports
pub use discovery::*;
pub use hosting::*;
pub use persistence::*;
pub use reporter::*;
pub use time::*;
