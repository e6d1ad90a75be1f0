// Imprint image captioning service library

pub mod compositor;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod server;
