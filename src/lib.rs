//! Pagination and identifier plumbing for AWS resource providers.
//!
//! [`paginate`] drives any continuation-token list API to completion,
//! [`id`] and [`arn`] encode, decode and derive the `scope/name` ids a provider
//! persists for its resources, and [`tags`] reconciles resource tags.

pub mod arn;
pub mod aws;
pub mod error;
pub mod id;
pub mod paginate;
pub mod tags;

pub use crate::error::{Error, Result};
