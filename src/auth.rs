//! Auth-domain values: redacted secrets, cached bearer credentials, and audience gating.

pub mod audience;
pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
