//! Session authentication primitives
//!
//! Reusable building blocks for opaque, expiring session tokens:
//! - Password hashing (Argon2id) for credential stores
//! - Session token minting, refresh and lifecycle classification
//!
//! Services define their own storage ports and adapt these types.
//! Tokens carry no claims: the token id is a random lookup key and all
//! session state lives in the service's token store.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{SessionIssuer, TokenState};
//! use chrono::{Duration, Utc};
//!
//! let issuer = SessionIssuer::new(Duration::hours(24), Duration::hours(24));
//! let token = issuer.issue("admin");
//! assert_eq!(issuer.classify(&token, Utc::now()), TokenState::Active);
//! ```

pub mod password;
pub mod session;

pub use password::PasswordError;
pub use password::PasswordHasher;
pub use session::SessionIssuer;
pub use session::SessionToken;
pub use session::TokenId;
pub use session::TokenIdError;
pub use session::TokenState;
