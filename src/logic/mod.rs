pub mod construct;
pub mod flatten;
pub mod query;

pub use construct::*;
pub use flatten::*;
pub use query::*;
