mod extract;
mod ingest;

pub use extract::run_extract;
pub use ingest::run_ingest;
