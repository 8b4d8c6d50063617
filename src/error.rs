use std::{error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    Bluez,
    ChannelError,
    TransportUnavailable,
    OperationNotFound,
    UnrecognizedCapabilityToken,
    AmbiguousEmptyResult,
    InvalidProperty,
}

impl From<ErrorType> for &'static str {
    fn from(error_type: ErrorType) -> &'static str {
        match error_type {
            ErrorType::Bluez => "Bluez",
            ErrorType::ChannelError => "ChannelError",
            ErrorType::TransportUnavailable => "TransportUnavailable",
            ErrorType::OperationNotFound => "OperationNotFound",
            ErrorType::UnrecognizedCapabilityToken => "UnrecognizedCapabilityToken",
            ErrorType::AmbiguousEmptyResult => "AmbiguousEmptyResult",
            ErrorType::InvalidProperty => "InvalidProperty",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let error_type: &str = self.clone().into();
        write!(f, "<BluezGattClient {} Error>", error_type)
    }
}

impl error::Error for ErrorType {}

#[derive(Debug, Clone)]
pub struct Error {
    name: String,
    description: String,
    combined_description: String,
    error_type: ErrorType,
}

impl Error {
    pub fn new<T: Into<String>>(name: T, description: T, error_type: ErrorType) -> Self {
        let name: String = name.into();
        let description: String = description.into();
        let combined_description = format!("{}: {}", name, description);
        Error {
            name,
            description,
            combined_description,
            error_type,
        }
    }

    pub fn from_type(error_type: ErrorType) -> Self {
        let name: String = error_type.to_string();
        let description: String = error_type.to_string();
        let combined_description = format!("{}: {}", name, description);
        Error {
            name,
            description,
            combined_description,
            error_type,
        }
    }

    pub fn from_string(error: String, error_type: ErrorType) -> Self {
        let name: String = error_type.to_string();
        let description: String = error;
        let combined_description = format!("{}: {}", name, description);
        Error {
            name,
            description,
            combined_description,
            error_type,
        }
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.error_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.error_type == other.error_type && self.description == other.description
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let error_type: &str = self.error_type.clone().into();
        write!(
            f,
            "**BluezGattClient {} Error**\n\n\t{}:\n\t\t{}",
            error_type, self.name, self.description,
        )
    }
}

impl error::Error for Error {
    #[allow(deprecated)]
    fn description(&self) -> &str {
        &self.combined_description
    }

    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.error_type)
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Error {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Error::from_string(err.to_string(), ErrorType::ChannelError)
    }
}
