pub mod cors;
pub mod envelope;
pub mod recovery;
pub mod response;
pub mod trace;

pub use cors::cors_layer;
pub use envelope::envelope_bare_errors;
pub use recovery::recovery_layer;
pub use response::{ApiResponse, ApiResult};
pub use trace::trace_layer;
