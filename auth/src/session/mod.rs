pub mod errors;
pub mod issuer;
pub mod token;

pub use errors::TokenIdError;
pub use issuer::SessionIssuer;
pub use token::SessionToken;
pub use token::TokenId;
pub use token::TokenState;
