// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // File could not be opened or read

    #[error("Not a DOCX container: {0}")]
    Archive(#[from] zip::result::ZipError), // Not a zip, or a corrupt one

    #[error("Missing document part: {0}")]
    MissingPart(String), // e.g. word/document.xml

    #[error("Malformed document XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Document XML has no w:body element")]
    MissingBody,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot open document {document}: {source}")]
    DocumentOpen {
        document: String,
        #[source]
        source: DocumentError,
    },

    #[error("Amendment {number} is malformed: {reason}")]
    MalformedAmendment { number: u32, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_culprit() {
        let err = ParseError::MalformedAmendment {
            number: 42,
            reason: "missing RepeatBlock-By author block".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Amendment 42 is malformed: missing RepeatBlock-By author block"
        );

        let err = ParseError::DocumentOpen {
            document: "AM_1234.docx".to_string(),
            source: DocumentError::MissingBody,
        };
        assert!(err.to_string().contains("AM_1234.docx"));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::Parse(ParseError::DocumentOpen { .. })));
    }
}
