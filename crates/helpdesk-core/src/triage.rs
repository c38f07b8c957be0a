//! Pure triage view-model: filtering, stage grouping, and priority
//! ordering of tickets for display. No I/O, idempotent on its inputs.

use std::cmp::Ordering;

use crate::model::{Status, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriageOptions {
    /// When false, tickets with a finished status are dropped and the
    /// result is a single ungrouped list.
    pub include_finished: bool,
    /// Whether per-row mutation actions are offered. Display concern
    /// only; it never changes which tickets appear or their order.
    pub technician_actions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageStage {
    Open,
    InProgress,
    Finished,
}

impl TriageStage {
    pub const ORDERED: [TriageStage; 3] = [Self::Open, Self::InProgress, Self::Finished];

    pub const fn header(self) -> &'static str {
        match self {
            Self::Open => "Abertos",
            Self::InProgress => "Em Andamento",
            Self::Finished => "Finalizados",
        }
    }

    /// Stage assignment is exhaustive: finished statuses land in
    /// `Finished`, `Em Andamento` in `InProgress`, and everything else
    /// (including unrecognized statuses) counts as still open.
    pub fn of(status: &Status) -> Self {
        if status.is_finished() {
            Self::Finished
        } else if matches!(status, Status::InProgress) {
            Self::InProgress
        } else {
            Self::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowActions {
    pub start_progress: bool,
    pub finish: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRow {
    pub ticket: Ticket,
    pub actions: RowActions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageGroup {
    /// `None` for the single ungrouped list; `Some(stage)` groups carry
    /// a header and are emitted only when non-empty.
    pub stage: Option<TriageStage>,
    pub rows: Vec<TriageRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageView {
    pub groups: Vec<TriageGroup>,
}

impl TriageView {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|group| group.rows.len()).sum()
    }
}

pub fn triage(tickets: &[Ticket], options: TriageOptions) -> TriageView {
    if !options.include_finished {
        let mut rows: Vec<TriageRow> = tickets
            .iter()
            .filter(|ticket| !ticket.status.is_finished())
            .map(|ticket| row_for(ticket, options))
            .collect();
        rows.sort_by(compare_rows);
        return TriageView {
            groups: vec![TriageGroup { stage: None, rows }],
        };
    }

    let mut groups = Vec::new();
    for stage in TriageStage::ORDERED {
        let mut rows: Vec<TriageRow> = tickets
            .iter()
            .filter(|ticket| TriageStage::of(&ticket.status) == stage)
            .map(|ticket| row_for(ticket, options))
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.sort_by(compare_rows);
        groups.push(TriageGroup {
            stage: Some(stage),
            rows,
        });
    }
    TriageView { groups }
}

fn row_for(ticket: &Ticket, options: TriageOptions) -> TriageRow {
    let actions = if options.technician_actions {
        RowActions {
            start_progress: matches!(ticket.status, Status::Open),
            finish: true,
        }
    } else {
        RowActions::default()
    };
    TriageRow {
        ticket: ticket.clone(),
        actions,
    }
}

fn compare_rows(left: &TriageRow, right: &TriageRow) -> Ordering {
    left.ticket
        .priority
        .rank()
        .cmp(&right.ticket.priority.rank())
        .then_with(|| {
            right
                .ticket
                .created_instant()
                .cmp(&left.ticket.created_instant())
        })
}
