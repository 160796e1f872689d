// Casetrail - lib.rs
//
// Library entry point. The CLI host lives in `main.rs` and is not part of
// the library surface; embedding hosts (desktop controllers, per-connection
// session managers) use these modules directly, holding one `Investigation`
// handle per active case and serialising access to it.

pub mod core;
pub mod store;
pub mod util;
