/// Router Module Index
///
/// Splits the routing table by access level so the login requirement is
/// applied once per group (via an Axum layer) rather than per handler.

/// Routes open to anonymous visitors. Handlers that accept a submission on a
/// public page (posting a comment) still take `AuthUser` themselves.
pub mod public;

/// Routes behind the login-required layer.
pub mod authenticated;
