//! Request extractors.

mod caller;
pub use caller::{Caller, TOKEN_PARAM};
