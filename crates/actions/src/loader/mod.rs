//! Rule-source loader.
//!
//! Reads the single action rule file (limits, fallback pool, rules) and
//! rejects structurally broken sources before any evaluation happens.
//! Non-structural problems (duplicate ids, unknown operators, fallback ids
//! without a rule) are logged and left to the engine's soft-failure paths.

mod core;
mod error;


pub use self::core::RuleSource;
pub use self::error::{Result, RuleError};
