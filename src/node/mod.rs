//! The Browserflow node: registry, parameter handling, dispatch, and failure
//! routing.

pub mod assembler;
pub mod dispatcher;
pub mod execution_options;
pub mod normalize;
pub mod operations;
pub mod params;
pub mod router;
pub mod schema;

pub use dispatcher::{Dispatcher, InputItem};
pub use normalize::{normalize, ErrorStatus, NormalizedError};
pub use operations::{resolve, HttpMethod, Operation};
pub use params::RawParameters;
pub use router::{FailureMode, ItemResult, OutputChannels, OutputMode};
