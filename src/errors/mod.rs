//! Structured error handling for API responses

pub mod codes;
pub mod kinds;
pub mod registry;
pub mod responder;
pub mod response;

pub use codes::ErrorCode;
pub use kinds::{BadRequestError, InvalidArgument, UserError};
pub use registry::{ErrorKind, ErrorRegistry, ErrorRule, MessageSource};
pub use responder::{exception_interceptor, ApiError, ErrorResponder, Resolution};
pub use response::{ErrorResult, INTERNAL_ERROR_MESSAGE};
