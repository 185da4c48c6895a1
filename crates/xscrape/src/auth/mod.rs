//! Authentication: session cookie storage and interactive browser login.

mod login;
mod session;

pub use login::BrowserAuth;
pub use session::Session;
