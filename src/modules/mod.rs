pub mod auth;
pub mod health;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::UserCredentials;
