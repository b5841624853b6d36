use std::fmt::Display;

/// Crate-wide result type.
pub type CmnResult<T> = Result<T, CmnError>;

/// The crate error type.
///
/// Every fatal condition in this crate is a domain validation error:
/// inputs are immutable and computations are deterministic, so a failure
/// is always an input or configuration problem, never a transient fault.
/// The message names the tables, layers, or regions involved.
#[derive(Debug, Fail)]
pub enum CmnError {
    #[fail(display = "{}", _0)]
    Validation(String),
}

impl CmnError {
    /// Returns a new validation error with the description string `desc`.
    pub fn new<S: Into<String>>(desc: S) -> CmnError {
        CmnError::Validation(desc.into())
    }

    /// Returns an `Err` containing a new validation error.
    pub fn err<T, S: Into<String>>(desc: S) -> CmnResult<T> {
        Err(CmnError::new(desc))
    }

    /// Prepends `pfx` to the error description.
    pub fn prepend<S: Display>(self, pfx: S) -> CmnError {
        match self {
            CmnError::Validation(desc) => {
                CmnError::Validation(format!("{}{}", pfx, desc))
            },
        }
    }
}

impl From<String> for CmnError {
    fn from(desc: String) -> CmnError {
        CmnError::new(desc)
    }
}

impl<'a> From<&'a str> for CmnError {
    fn from(desc: &'a str) -> CmnError {
        CmnError::new(desc)
    }
}
