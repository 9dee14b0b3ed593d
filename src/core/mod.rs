pub mod app;
pub mod chat_stream;
pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod formatter;
pub mod page;
pub mod session;
pub mod upload;
