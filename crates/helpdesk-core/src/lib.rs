pub mod board;
pub mod model;
pub mod triage;

#[cfg(test)]
mod test_support;

pub use board::TicketBoard;
pub use model::{
    Priority, Role, Status, Ticket, TicketDraft, User, FALLBACK_TITLE, MAX_TITLE_CHARS,
    TECHNICIAN_SECTOR,
};
pub use triage::{
    triage, RowActions, TriageGroup, TriageOptions, TriageRow, TriageStage, TriageView,
};
