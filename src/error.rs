use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GribError {
    /// The section tag read from the buffer is not the one expected.
    WrongSectionNumber { expected: u8, actual: u8 },
    /// The template number is defined by WMO but this crate does not handle it.
    TemplateNotImplemented(TemplateCode),
    /// The template number is not a defined code.
    TemplateUnknown(TemplateCode),
    /// Fewer bytes are available than the section (or its template) requires.
    TruncatedSection { declared: usize, available: usize },
    /// The external image codec rejected the payload or failed to produce one.
    CompressedPayloadError(String),
    /// The output buffer cannot hold the packed section.
    BufferTooSmall { required: usize, available: usize },
    InvalidValue(String),
    NotSupported(String),
}

impl Error for GribError {}

impl Display for GribError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::WrongSectionNumber { expected, actual } => {
                write!(f, "Wrong section number: expected {expected}, found {actual}")
            }
            Self::TemplateNotImplemented(code) => write!(f, "Template {code} is not implemented"),
            Self::TemplateUnknown(code) => write!(f, "Unknown template {code}"),
            Self::TruncatedSection {
                declared,
                available,
            } => write!(
                f,
                "Section truncated: {declared} octets required but only {available} available"
            ),
            Self::CompressedPayloadError(s) => write!(f, "Compressed payload error: {s}"),
            Self::BufferTooSmall {
                required,
                available,
            } => write!(
                f,
                "Buffer too small: {required} octets required but capacity is {available}"
            ),
            Self::InvalidValue(s) => write!(f, "Invalid value: {s}"),
            Self::NotSupported(s) => write!(f, "Not supported: {s}"),
        }
    }
}

/// A template identified by the number of the section it belongs to and its
/// template number, displayed as `5.40` or `3.30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateCode {
    pub section: u8,
    pub number: u16,
}

impl TemplateCode {
    pub fn new(section: u8, number: u16) -> Self {
        Self { section, number }
    }
}

impl Display for TemplateCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.number)
    }
}
