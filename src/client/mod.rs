//! The RT client: session handling and the public entity operations.

mod config;
mod dispatch;
mod fetch;
mod links;
mod network;
mod queue;
mod ticket;
mod user;

pub use config::ClientConfig;
pub use fetch::RtClient;
pub use links::RelationMap;
pub use network::ReqwestTransport;
pub use ticket::{HistoryOpts, SearchOpts};
