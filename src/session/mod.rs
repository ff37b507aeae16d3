pub mod session;

pub use session::{ModelSlot, Session};
