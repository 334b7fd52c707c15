//! HTTP layer for the trainer API.
//!
//! `AuthorizedClient` is the gated path: it refuses to dispatch
//! without an active session and interprets 401 rejections.
//! `InterceptingClient` is the ungated path for collaborators that
//! issue their own calls; it attaches the bearer header by path policy
//! and passes everything else through.

pub mod client;
pub mod interceptor;

pub use client::AuthorizedClient;
pub use interceptor::InterceptingClient;
