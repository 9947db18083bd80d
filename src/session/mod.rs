pub mod list_session;
pub mod sync;

pub use list_session::*;
pub use sync::*;
