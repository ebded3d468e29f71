//! FastAPI route and Pydantic model discovery for the compliance checker

mod inspector;
mod pydantic;
mod routes;
mod utils;

pub use inspector::*;
pub use pydantic::*;
pub use routes::*;
