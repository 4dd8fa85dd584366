pub mod cache;
pub mod graphql;
pub mod http;
pub mod rest;
pub mod traits;

pub use cache::*;
pub use graphql::*;
pub use http::*;
pub use rest::*;
pub use traits::*;
