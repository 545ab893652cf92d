// Library for tests to access modules

pub mod aggregate;
pub mod config;
pub mod decoders;
pub mod detect;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;
