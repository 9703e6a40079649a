//! lib.rs -> Registering the modules
//!
//! Zero-copy decoding of the input the loader hands to a program's entrypoint,
//! with the pieces a program needs around it: account views, status codes,
//! program derived addresses, cross-program invocations and logging. The
//! username registry program built on top doubles as an example.

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

pub mod account;
pub mod cpi;
pub mod cursor;
pub mod deserialize;
pub mod error;
pub mod instruction;
pub mod layout;
pub mod log;
pub mod processor;
pub mod seeds;
pub mod state;
pub mod status;

#[cfg(not(target_os = "solana"))]
pub mod builder;

mod macros;

pub use macros::process_entrypoint;

#[doc(hidden)]
pub use solana_program;
