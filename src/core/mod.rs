pub mod belt;
pub mod errors;
pub mod execution;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod worker;
