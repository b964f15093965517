pub mod controller;
pub mod handoff;

pub use controller::{SessionController, SessionSnapshot};
pub use handoff::{SessionStore, SessionSync};
