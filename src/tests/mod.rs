pub mod common;

mod http_transport;
mod request_builder;
