pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod onboarding;
pub mod services;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use app::app;
pub use state::AppState;
