//! Automated (`cargo test`) coverage for the allocation engines and
//! their supporting maps and schemes.

pub mod testbed;
mod slices;
mod composition;
