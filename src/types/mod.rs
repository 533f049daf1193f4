//! Core value types: the request unit, its normalized response, and run timing.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Request`] | One HTTP call plus its Pending/Running/Done state |
//! | [`Response`] | Normalized outcome; failures carry sentinel values |
//! | [`ElapsedTime`] | Run duration in micros through days |

pub mod elapsed;
pub mod request;
pub mod response;

pub use elapsed::ElapsedTime;
pub use request::{Request, RequestId, RequestState};
pub use response::{Response, ResponseSummary, FAILED_CODE};
