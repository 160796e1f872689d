// Casetrail - core/mod.rs
//
// The pure core: data model, timestamp normalisation, timeline ordering,
// and serialisers. No filesystem access anywhere in this layer; the store
// decides where bytes land.

pub mod export;
pub mod import;
pub mod model;
pub mod normalize;
pub mod timeline;
