//! This library exposes sampling point selectors to remote clients.
//!
//! Selectors are registered by name in a [Registry], the default names being
//! `isse.activelearningselector` and `isse.equidistantselector`. A [Server]
//! accepts TCP connections and answers line-delimited JSON requests:
//!
//! ```text
//! -> {"object": "isse.activelearningselector", "method": "reset", "args": [10]}
//! <- {"ok": null}
//! -> {"object": "isse.activelearningselector", "method": "hasNextInput", "args": []}
//! <- {"ok": false}
//! ```
//!
//! Failures are reported as `{"error": message}` and leave the connection open.
#![warn(missing_docs)]
mod errors;
mod registry;
mod server;

pub use errors::*;
pub use registry::*;
pub use server::*;
