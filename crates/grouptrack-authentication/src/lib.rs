//! Grouptrack Authentication
//!
//! Opens a platform session for an unattended run:
//!
//! - `Totp`: RFC 6238 one-time codes from a base32 shared secret
//! - `Authenticator`: password login, falling back to a single TOTP
//!   verification when the platform asks for a second factor
//!
//! There is exactly one verification attempt. A code that is rejected, or a
//! session that still has no identity afterwards, fails the run.

pub mod authenticator;
pub mod totp;

pub use authenticator::Authenticator;
pub use totp::Totp;
