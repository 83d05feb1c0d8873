pub mod codec;
pub mod config;
pub mod error;
pub mod frontend;
pub mod introspect;
pub mod schema;
pub mod statement;
pub mod store;
pub mod terminal;
pub mod workbench;

// Re-export them for easier access from main.rs
pub use codec::*;
pub use config::*;
pub use error::*;
pub use frontend::*;
pub use schema::*;
pub use statement::*;
pub use store::*;
pub use workbench::*;
