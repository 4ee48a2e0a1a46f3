use failure::Fail;

#[derive(Debug, Fail)]
pub enum NluRecognizerError {
    #[fail(display = "Invalid recognition response: {}", _0)]
    InvalidResponse(String),
    #[fail(display = "Missing recognition result")]
    MissingResult,
    #[fail(display = "Invalid application setting: {}", _0)]
    InvalidApplication(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
