use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Preference store rejected the write")]
    PreferenceStore,
}

pub type Result<T> = core::result::Result<T, GridError>;
