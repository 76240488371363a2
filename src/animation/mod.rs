//! Frame sequencing.

pub(crate) mod driver;
