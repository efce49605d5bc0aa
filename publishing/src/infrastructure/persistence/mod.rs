pub mod query;
pub mod repository;
pub mod schema;
pub mod scope;
