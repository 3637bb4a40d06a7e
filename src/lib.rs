pub mod constants;
pub mod errors;
pub mod host;
pub mod node;
pub mod services;
pub mod utils;
