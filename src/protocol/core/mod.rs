//! Transport layer shared by the pipeline steps.

pub mod reqwest_client;
pub mod transport;
pub mod types;

pub use reqwest_client::ReqwestPortalClient;
pub use transport::{PortalHttpClient, PortalHttpClientError};
pub use types::{PortalHttpResponse, ResponseBodyError};
