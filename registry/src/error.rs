use thiserror::Error;

use volunteer_store::StoreError;

/// Every way a registry operation can fail.
///
/// Domain failures carry a human-readable message and are detected before
/// any store is touched.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    MissingCredentials(String),

    /// Reserved; no operation currently produces it.
    #[error("{0}")]
    FailedToRegisterGroup(String),

    #[error("{0}")]
    GroupAlreadyRegistered(String),

    #[error("{0}")]
    GroupNotAvailable(String),

    #[error("{0}")]
    ServicesNotAvailable(String),

    #[error("{0}")]
    NotAMember(String),

    #[error("{0}")]
    AlreadyAMember(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// The variant tag, e.g. `"GroupNotAvailable"`.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::MissingCredentials(_) => "MissingCredentials",
            RegistryError::FailedToRegisterGroup(_) => "FailedToRegisterGroup",
            RegistryError::GroupAlreadyRegistered(_) => "GroupAlreadyRegistered",
            RegistryError::GroupNotAvailable(_) => "GroupNotAvailable",
            RegistryError::ServicesNotAvailable(_) => "ServicesNotAvailable",
            RegistryError::NotAMember(_) => "NotAMember",
            RegistryError::AlreadyAMember(_) => "AlreadyAMember",
            RegistryError::Store(_) => "Store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = RegistryError::NotAMember("You are not a member of GreenEarth".into());
        assert_eq!(err.to_string(), "You are not a member of GreenEarth");
        assert_eq!(err.kind(), "NotAMember");
    }

    #[test]
    fn store_errors_convert() {
        let err: RegistryError = StoreError::Backend("disk full".into()).into();
        assert_eq!(err.kind(), "Store");
        assert!(err.to_string().contains("disk full"));
    }
}
