pub mod login;
pub mod logout;
pub mod register;
pub mod subscription;

pub use login::login_post;
pub use logout::logout_get;
pub use register::register_post;
pub use subscription::subscription_get;
