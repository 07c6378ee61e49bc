//! # REST API Interface Layer
//!
//! Handlers are thin: decode the request, call the domain, map the result.
//! No splitting rules live here.

pub mod example_apis;
pub mod mappers;
pub mod receipt_apis;
pub mod split_apis;
pub mod tab_apis;
