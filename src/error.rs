//! Error types for sf-package-builder.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Duplicate component: {type_name} {api_name} is already selected")]
    DuplicateComponent {
        type_name: String,
        api_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_component_display() {
        let err = Error::new(ErrorKind::DuplicateComponent {
            type_name: "ApexClass".to_string(),
            api_name: "AccountService".to_string(),
        });
        assert!(err.to_string().contains("ApexClass"));
        assert!(err.to_string().contains("AccountService"));
    }
}
