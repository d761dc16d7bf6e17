//! Shared utilities (hex dump and value formatting).

pub mod hex;
