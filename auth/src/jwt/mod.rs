pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;
pub mod token;
pub mod verifier;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use issuer::TokenIssuer;
pub use issuer::DEFAULT_TOKEN_TTL_MINUTES;
pub use token::IssuedToken;
pub use token::SessionToken;
pub use verifier::TokenVerifier;
