//! Sample entities used by the demo binary and the tests.

pub mod movie;
pub mod profile;

pub use movie::*;
pub use profile::*;
