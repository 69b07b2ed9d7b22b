//! Error types and handling for the weather builder

use thiserror::Error;

use crate::models::Quantity;

/// Main error type for building a weather dataset
#[derive(Error, Debug)]
pub enum WeatherBuilderError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A quantity required by the dataset is absent from the forecast payload
    #[error("Forecast payload is missing the '{quantity}' element")]
    MissingQuantity { quantity: Quantity },

    /// Unparseable duration, value or interval
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// An interval could not be placed in the hourly window
    #[error("Alignment error: {message}")]
    Alignment { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// A collaborator call exceeded its time budget
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl WeatherBuilderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing_quantity(quantity: Quantity) -> Self {
        Self::MissingQuantity { quantity }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new alignment error
    pub fn alignment<S: Into<String>>(message: S) -> Self {
        Self::Alignment {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherBuilderError::Config { .. } => {
                "Configuration error. Please check your config file and contact string.".to_string()
            }
            WeatherBuilderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherBuilderError::MissingQuantity { quantity } => {
                format!("The forecast service returned no '{quantity}' data.")
            }
            WeatherBuilderError::Decode { .. } | WeatherBuilderError::Alignment { .. } => {
                "The forecast service returned data that could not be understood.".to_string()
            }
            WeatherBuilderError::Api { .. } => {
                "Unable to connect to the forecast service. Please check your internet connection."
                    .to_string()
            }
            WeatherBuilderError::Timeout { seconds } => {
                format!("The forecast service did not answer within {seconds} seconds.")
            }
        }
    }
}
