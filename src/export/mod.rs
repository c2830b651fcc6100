/// PNG encoding and download sinks.
pub mod download;
