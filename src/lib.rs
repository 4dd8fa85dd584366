pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;

// Export the facade
pub use api::{Backend, ImdbApi};

// Export error types
pub use error::{ImdbError, Result};

// Export marshaling entry points
pub use logic::{flatten, flatten_record, Constructor, Flatten, QueryBuilder, Record};

// Export all model types
pub use model::*;
