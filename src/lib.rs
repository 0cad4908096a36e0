pub mod config;
pub mod controller;
pub mod display;
pub mod http_client;
pub mod locale;
pub mod lookup_client;
pub mod provider;
pub mod region;
pub mod state;
pub mod verdict;
