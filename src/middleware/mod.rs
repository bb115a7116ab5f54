mod auth;
mod rate_limit;
mod security_headers;

pub use auth::*;
pub use rate_limit::*;
pub use security_headers::*;
