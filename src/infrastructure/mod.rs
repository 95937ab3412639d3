// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod data_stream_store;
pub mod http_response;
pub mod influx_client;
