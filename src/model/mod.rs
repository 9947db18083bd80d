pub mod subtask;
pub mod item;
pub mod list;
pub mod config;

pub use subtask::*;
pub use item::*;
pub use list::*;
pub use config::*;
