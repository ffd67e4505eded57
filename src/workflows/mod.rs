pub mod download;
pub mod extract;
pub mod layout;
pub mod scrape;
