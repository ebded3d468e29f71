pub mod parser;
pub mod schema;

pub use parser::*;
pub use schema::*;
