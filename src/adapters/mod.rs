// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod local;

pub use http::DigitrafficClient;
pub use local::LocalStorage;
