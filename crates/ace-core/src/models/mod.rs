pub mod endpoint;
pub mod issue;
pub mod report;
pub mod schema;

pub use endpoint::*;
pub use issue::*;
pub use report::*;
pub use schema::*;
