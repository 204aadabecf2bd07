// netpush-api: HTTP client for pushing configuration profiles to network devices

pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod token;
pub mod transport;

pub use dispatch::{MAX_CLIENT_ID, UpdateDispatcher, UpdateOutcome, classify, client_id};
pub use endpoint::{Endpoint, is_valid_url};
pub use error::Error;
pub use token::{
    PLACEHOLDER_TOKEN, RemoteTokenProvider, Session, StaticTokenProvider, TokenProvider,
    TokenSource,
};
pub use transport::TransportConfig;
