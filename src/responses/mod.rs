pub mod errors;
pub mod html;

pub use errors::{error_response, ResultResp};
pub use html::{css_response, html_response, see_other};
