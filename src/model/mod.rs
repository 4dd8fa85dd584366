pub mod catalog;
pub mod common;
pub mod entity;
pub mod identifier;
pub mod schema;
pub mod subselection;

pub use catalog::build_registry;
pub use common::*;
pub use entity::*;
pub use identifier::*;
pub use schema::*;
pub use subselection::*;
