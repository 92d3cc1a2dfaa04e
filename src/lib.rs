pub mod auth;
pub mod configuration;
pub mod favorites;
pub mod mangadex;
pub mod mangadex_client;
pub mod pagination;
pub mod run;
pub mod search;
pub mod session;
pub mod storage;

pub use configuration::Settings;
pub use mangadex_client::MangaDexClient;
pub use run::run;
