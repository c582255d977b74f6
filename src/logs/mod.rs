pub mod middleware;
pub mod repo;

pub use middleware::audit_requests;
