//! A client for the Checkmate URL testing service.
//!
//! Before a URL goes anywhere near the service it runs through a pre-flight
//! guard: [`clean_url`] splits the raw string into normalized parts, checks
//! that the host is a publicly routable location, and only then joins the
//! parts back into the canonical string that
//! [`CheckmateClient::check_url`] forwards. Evasion tricks (case games,
//! alternate IP spellings, embedded credentials, trailing artifacts) are
//! flattened out before any matching happens, and URLs pointing at loopback,
//! private or special-use locations never reach the network at all.
//!
//! ```no_run
//! # async fn example() -> Result<(), checkmatelib::CheckmateError> {
//! use checkmatelib::CheckmateClient;
//!
//! let client = CheckmateClient::new("https://checkmate.example.com", None)?;
//!
//! match client.check_url("http://bad.example.net/page", false, None, None).await? {
//!     Some(blocked) => println!("blocked: {:?}", blocked.reason_codes()),
//!     None => println!("nothing to report"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod response;
pub mod url;

pub use client::CheckmateClient;
pub use error::CheckmateError;
pub use response::BlockResponse;
pub use url::{clean_url, CanonicalUrl};
