//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. CORS
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the span, echoed in the response)
//!
//! Authentication is per-handler via the extractors in [`auth`].

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
