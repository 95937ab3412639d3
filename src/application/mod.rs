// Application layer - Client resolution and settings use cases
pub mod client_factory;
pub mod data_stream_repository;
pub mod data_stream_type;
pub mod settings_form;
pub mod settings_store;
