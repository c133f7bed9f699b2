//! Wire types returned by the course endpoints, one module per endpoint family.

pub mod course;
pub mod major;
pub mod search;
