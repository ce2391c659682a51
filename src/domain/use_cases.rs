pub mod ingest;
pub mod videos;
