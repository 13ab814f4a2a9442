pub mod claims;
pub mod errors;
pub mod issuer;
pub mod secret;
pub mod validator;

pub use claims::Claims;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use secret::ConfigError;
pub use secret::SigningSecret;
pub use validator::Identity;
pub use validator::TokenValidator;
