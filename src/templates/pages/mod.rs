pub mod evaluate;
pub mod history;
pub mod home;
pub mod result;

pub use evaluate::evaluate_page;
pub use history::history_page;
pub use home::home_page;
pub use result::result_page;
