pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use extractor::AuthUser;
pub use token::TokenKeys;
