mod claims;
mod signing;

pub use claims::*;
pub use signing::*;
