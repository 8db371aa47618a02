use crate::model::SlotId;

#[derive(Debug)]
pub enum DeskError {
    NotFound(SlotId),
    Persistence(String),
    Gate(String),
}

impl std::fmt::Display for DeskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeskError::NotFound(id) => write!(f, "slot not found: {id}"),
            DeskError::Persistence(e) => write!(f, "persistence error: {e}"),
            DeskError::Gate(e) => write!(f, "closing day lookup error: {e}"),
        }
    }
}

impl std::error::Error for DeskError {}
