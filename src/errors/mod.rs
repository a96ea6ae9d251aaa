//! Structured errors carried by permission predicates
//!
//! A predicate denies access with a reason by returning a [`CustomError`].
//! The engine reads only the error code and the `remediationOptions`
//! metadata field; everything else is passed through for the host.

mod custom;

pub use custom::{
    bad_request, custom, forbidden, internal_server_error, not_found, unauthorized, CustomError,
    ErrorExtra,
};
