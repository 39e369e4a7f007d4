//! Service consumers built on the verb surface.

mod response;
mod whoami;

pub use response::ServiceResponse;
pub use whoami::{UserInfo, WhoAmI};
