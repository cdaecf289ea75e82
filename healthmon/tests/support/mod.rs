pub mod http;
pub mod monitor;
