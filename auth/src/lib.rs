//! Authentication utilities library
//!
//! Provides the authentication building blocks for the study planner:
//! - Password hashing (Argon2id)
//! - Stateless session tokens (HS256 JWT) with issuance and verification
//! - Signing secret loading with a production guard
//! - Authentication coordination
//!
//! Resolving a verified identity to a user record is left to the service,
//! which owns the user store.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SigningSecret};
//! use chrono::Duration;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, Duration::minutes(1440));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let issued = auth.authenticate("password123", &hash, "user123").unwrap();
//!
//! // Validate token
//! let identity = auth.verify_token(issued.token.as_str()).unwrap();
//! assert_eq!(identity, "user123");
//! ```

pub mod authenticator;
pub mod clock;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use errors::AuthError;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionToken;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use jwt::DEFAULT_TOKEN_TTL_MINUTES;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SigningSecret;
