mod parse;
mod scraper;
mod scraper_error;

pub use parse::parse_listing_html;
pub use self::scraper::ListingScraper;
pub use scraper_error::ScraperError;
