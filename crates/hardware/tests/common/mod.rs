//! Shared test infrastructure.


pub use harness::{TestContext, assert_invariants, contents};
