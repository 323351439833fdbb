//! Test infrastructure shared by the unit tests of this crate.
