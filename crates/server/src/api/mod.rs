pub mod cache;
pub mod handlers;
pub mod lookup;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
