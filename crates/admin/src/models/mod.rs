//! Domain models for the bundle app.

mod session;

pub use session::ShopSession;
