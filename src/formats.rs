pub mod json;

pub use self::json::{JsonError, JsonResult};
