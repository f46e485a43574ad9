//! Types shared by the partners directory crates: partner records, filter and sort
//! vocabulary, the remote document shape, and fetch errors.

pub mod domain;
pub mod error;
pub mod protocol;
