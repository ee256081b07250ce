use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Error: {0}")]
    Data(String),

    /// A group ended up holding more members than its capacity, or a trial
    /// produced an incomplete assignment. Always a defect, never caller input.
    #[error("Capacity Error: {0}")]
    Capacity(String),
}

impl GroupForgeError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity(_))
    }
}

pub type GfResult<T> = Result<T, GroupForgeError>;
