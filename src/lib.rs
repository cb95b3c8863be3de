#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! An immutable URI value type with an [RFC 3986] normalization pipeline.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! **Parsing.** [`Uri::parse`] splits a string into its components without
//! percent-decoding them. The lower-level [`parse::parse`] returns the plain
//! [`Components`](component::Components) record instead.
//!
//! **Reading and editing.** A [`Uri`] never changes once constructed. Its
//! `with_*` methods return edited copies, and a [`UriBuilder`] stages any
//! number of edits before committing them with [`build`](UriBuilder::build).
//!
//! **Query data.** The [`query`] module converts between raw query strings
//! and ordered key-value data under the `application/x-www-form-urlencoded`
//! rules.
//!
//! **Normalization.** [`Uri::normalize`] applies the semantics-preserving
//! steps of [Section 6.2.2 of RFC 3986][norm] and related conventions.
//! The [`normalize`] module adds opt-in steps that may change the identified
//! resource, such as forcing `https` or sorting the query.
//!
//! [norm]: https://datatracker.ietf.org/doc/html/rfc3986/#section-6.2.2
//!
//! # Examples
//!
//! ```
//! use tidy_uri::Uri;
//!
//! let uri = Uri::parse("HTTP://www.Example.com:80/a/./b/../c//d?x=1#top")?;
//! let normalized = uri.normalize();
//!
//! assert_eq!(normalized.to_string(), "http://www.example.com/a/c/d?x=1#top");
//! assert_eq!(normalized.normalize(), normalized);
//! # Ok::<_, tidy_uri::error::ParseError>(())
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `DEBUG` when a string fails to parse
//! and `TRACE` for every normalization step applied. Nothing is logged unless
//! a subscriber is installed.
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support. This implies `impl-error`.
//!
//! - `impl-error`: Implements [`Error`](core::error::Error) for the error
//!   types of this crate.
//!
//! - `serde`: Implements [`Serialize`] and [`Deserialize`] for [`Uri`] as a
//!   string, and derives both for [`NormalizeOptions`](normalize::NormalizeOptions).
//!
//! [`Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html

extern crate alloc;

pub mod build;
pub mod component;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod query;

mod uri;

pub use build::UriBuilder;
pub use uri::Uri;

#[cfg(feature = "impl-error")]
use core::error::Error;
