use crate::repo::ErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    /// Store failures are forwarded with their original message
    #[error(transparent)]
    StoreError(#[from] crate::repo::Error),
}

impl FacadeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacadeError::StoreError(e) => e.kind(),
        }
    }
}
