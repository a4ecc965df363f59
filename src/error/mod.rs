//! Error taxonomy for the Genie client.
//!
//! Every failure resolves to one of four kinds, none of which is fatal to the
//! process:
//!
//! | Kind | Raised when | Effect on the conversation |
//! |------|-------------|----------------------------|
//! | Validation | input is empty after trimming | nothing happens, no network call |
//! | Transport | connect failure, non-2xx, timeout | submit phase: user message rolled back; stream phase: turn sealed with an error |
//! | Decode | a stream frame is malformed | frame skipped, stream continues |
//! | State | a turn is submitted while another is pending | rejected locally |
//!
//! ```ignore
//! use genie::error::{GenieError, ErrorKind};
//!
//! match client.send("Hello", &mut renderer).await {
//!     Ok(report) => println!("{}", report.message.text()),
//!     Err(err) if err.kind() == ErrorKind::State => eprintln!("{}", err.user_message()),
//!     Err(err) => eprintln!("Error: {}", err),
//! }
//! ```

mod decode;
mod genie_error;
mod result;
mod transport;

pub use decode::DecodeError;
pub use genie_error::{ErrorKind, GenieError, StateError, ValidationError};
pub use result::GenieResult;
pub use transport::{classify_reqwest_error, TransportError};
