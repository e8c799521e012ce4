//! Data source facade and the transport it sends through.

pub mod data_source;
pub mod location;
pub mod transport;

pub use data_source::{DataSource, RawResponse};
pub use location::LocationQuery;
pub use transport::{HttpTransport, OutboundRequest, Transport, TransportResponse};
