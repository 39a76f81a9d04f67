//! Channel wire frames, inbound validation, and the typed dispatch table.

pub mod dispatch;
pub mod types;
pub mod validator;

pub use dispatch::{Arrival, DispatchTable, Normalizer};
pub use types::{ChannelEvent, WireFrame};
