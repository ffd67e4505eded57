pub mod downloader;
pub mod listing;
pub mod status;
