pub mod env;
pub mod operation_errors;
pub mod redact;
pub mod suggest;
