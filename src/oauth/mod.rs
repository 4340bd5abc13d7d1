pub mod credentials;
pub mod manager;
pub mod token;

pub use credentials::Credentials;
pub use manager::{AccessToken, RefreshPolicy, TokenManager};
pub use token::{exchange_refresh_token, IssuedToken};
