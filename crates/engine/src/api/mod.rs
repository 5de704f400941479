//! Console entry point: parse a line, dispatch it to the use cases, answer
//! with a JSON response.

mod console;
mod request;
mod response;

pub use console::Console;
pub use request::{parse_request, Request, RequestError, HELP};
pub use response::{ErrorCode, ResponseResult};
