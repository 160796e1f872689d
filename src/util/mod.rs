// Casetrail - util/mod.rs
//
// Shared infrastructure: errors, constants, logging.

pub mod constants;
pub mod error;
pub mod logging;
