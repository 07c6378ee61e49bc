//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain functions.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Exposing the splitter over REST
//! - **Error Translation**: Field-level validation issues become `400 { errors }`,
//!   unreadable input becomes `400 { error }`, internal faults become `500`
//! - **Logging**: One `info!` line per request, `error!` for faults
//!
//! ## Supported Operations
//!
//! - **POST /api/split**: Split a tab and return a share link
//! - **GET /api/split/load**: Recompute a split from a share link
//! - **POST /api/tab/validate**: Check a tab without splitting it
//! - **GET /api/example**: Random (optionally seeded) example tab and split
//! - **POST /api/receipt/prefill**: Turn extracted receipt data into a tab form

pub mod rest;
