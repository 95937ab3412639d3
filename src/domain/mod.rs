// Domain layer - Configuration and entity models
pub mod data_stream;
pub mod server_config;
