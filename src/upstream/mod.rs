//! Upstream Module
//!
//! Everything that talks to, or identifies us to, the Emby server.

mod account;
mod client;
mod session;

pub use account::Account;
pub use client::EmbyClient;
pub use session::{AuthSession, ClientIdentity, SessionCache};
