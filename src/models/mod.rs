pub mod session;

pub use session::{format_elapsed, SessionAssets, SessionRecord};
