pub mod raw_response;

pub use self::raw_response::{RawEntity, RawIntent, RawResponse};
