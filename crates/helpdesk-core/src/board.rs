//! Local dashboard state: the visible ticket set and how confirmed
//! server mutations patch it.

use crate::model::Ticket;
use crate::triage::{triage, TriageOptions, TriageView};

/// Holds the tickets currently visible to a dashboard surface. All
/// mutations apply server-confirmed entities only; optimistic local
/// echoes are never inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
    include_finished: bool,
}

impl TicketBoard {
    pub fn new(include_finished: bool) -> Self {
        Self {
            tickets: Vec::new(),
            include_finished,
        }
    }

    pub fn include_finished(&self) -> bool {
        self.include_finished
    }

    /// Records the visibility filter for subsequent mutations. Callers
    /// reload from the server after flipping it, as the original
    /// dashboard does.
    pub fn set_include_finished(&mut self, include_finished: bool) {
        self.include_finished = include_finished;
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Replaces the board contents from a fresh listing, applying the
    /// visibility filter.
    pub fn replace_all(&mut self, tickets: Vec<Ticket>) {
        self.tickets = if self.include_finished {
            tickets
        } else {
            tickets
                .into_iter()
                .filter(|ticket| !ticket.status.is_finished())
                .collect()
        };
    }

    /// Prepends a server-confirmed newly created ticket.
    pub fn insert_created(&mut self, ticket: Ticket) {
        self.tickets.insert(0, ticket);
    }

    /// Applies a confirmed status update. When the new status is
    /// finished and finished tickets are hidden, the ticket leaves the
    /// visible set; otherwise it is updated in place. Unknown ids are
    /// ignored.
    pub fn apply_status_update(&mut self, updated: Ticket) {
        if updated.status.is_finished() && !self.include_finished {
            self.tickets.retain(|ticket| ticket.id != updated.id);
            return;
        }
        if let Some(existing) = self
            .tickets
            .iter_mut()
            .find(|ticket| ticket.id == updated.id)
        {
            *existing = updated;
        }
    }

    pub fn view(&self, technician_actions: bool) -> TriageView {
        triage(
            &self.tickets,
            TriageOptions {
                include_finished: self.include_finished,
                technician_actions,
            },
        )
    }
}
