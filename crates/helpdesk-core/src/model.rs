use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TECHNICIAN_SECTOR: &str = "TI";
pub const MAX_TITLE_CHARS: usize = 60;
pub const FALLBACK_TITLE: &str = "Chamado";

const UNKNOWN_PRIORITY_RANK: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Requester,
    Technician,
    Other(String),
}

impl Role {
    pub fn wire_value(&self) -> &str {
        match self {
            Self::Requester => "usuario",
            Self::Technician => "tecnico",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "usuario" => Self::Requester,
            "tecnico" => Self::Technician,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.wire_value().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn wire_value(&self) -> &str {
        match self {
            Self::Urgent => "Urgente",
            Self::High => "Alta",
            Self::Medium => "Média",
            Self::Low => "Baixa",
            Self::Other(raw) => raw,
        }
    }

    /// Triage rank: lower sorts first. Values outside the fixed
    /// enumeration rank after every known priority.
    pub fn rank(&self) -> u32 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Other(_) => UNKNOWN_PRIORITY_RANK,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Urgente" => Self::Urgent,
            "Alta" => Self::High,
            "Média" => Self::Medium,
            "Baixa" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.wire_value().to_owned()
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

impl Status {
    pub fn wire_value(&self) -> &str {
        match self {
            Self::Open => "Aberto",
            Self::InProgress => "Em Andamento",
            Self::Resolved => "Resolvido",
            Self::Closed => "Fechado",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Aberto" => Self::Open,
            "Em Andamento" => Self::InProgress,
            "Resolvido" => Self::Resolved,
            "Fechado" => Self::Closed,
            _ => Self::Other(value),
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.wire_value().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub sector: Option<String>,
}

impl User {
    pub fn is_technician(&self) -> bool {
        matches!(self.role, Role::Technician)
    }

    /// Non-empty sector label, if the server reported one.
    pub fn sector_label(&self) -> Option<&str> {
        self.sector
            .as_deref()
            .map(str::trim)
            .filter(|sector| !sector.is_empty())
    }

    /// Display identity used as the default requester name on new tickets.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_str()
        } else {
            self.name.as_str()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    pub location: String,
    pub requester_name: String,
    #[serde(default)]
    pub requester_sector: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    /// Creation instant for triage ordering. Unparseable timestamps
    /// degrade to the Unix epoch so they deterministically sort oldest.
    pub fn created_instant(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Client-side input for ticket creation. The server-confirmed `Ticket`
/// is the source of truth once the gateway call resolves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub location: String,
    pub requester_name: String,
    pub requester_sector: Option<String>,
    pub responsible_name: Option<String>,
}

impl TicketDraft {
    /// Title sent on creation: the explicit title, else the first line of
    /// the description, else a fixed fallback; always capped at
    /// `MAX_TITLE_CHARS` characters.
    pub fn derived_title(&self) -> String {
        let explicit = self.title.trim();
        let source = if explicit.is_empty() {
            self.description
                .lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .unwrap_or(FALLBACK_TITLE)
        } else {
            explicit
        };
        source.chars().take(MAX_TITLE_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with(title: &str, description: &str) -> TicketDraft {
        TicketDraft {
            title: title.to_owned(),
            description: description.to_owned(),
            ..TicketDraft::default()
        }
    }

    #[test]
    fn priority_rank_orders_urgent_before_low_and_unknown_last() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert!(Priority::Low.rank() < Priority::Other("Crítica".to_owned()).rank());
    }

    #[test]
    fn status_roundtrips_wire_values_and_preserves_unknowns() {
        let parsed: Status = serde_json::from_str("\"Em Andamento\"").expect("parse status");
        assert_eq!(parsed, Status::InProgress);

        let unknown: Status = serde_json::from_str("\"Pausado\"").expect("parse unknown status");
        assert_eq!(unknown, Status::Other("Pausado".to_owned()));
        assert_eq!(
            serde_json::to_string(&unknown).expect("serialize status"),
            "\"Pausado\""
        );
    }

    #[test]
    fn finished_statuses_are_resolved_and_closed_only() {
        assert!(Status::Resolved.is_finished());
        assert!(Status::Closed.is_finished());
        assert!(!Status::Open.is_finished());
        assert!(!Status::InProgress.is_finished());
        assert!(!Status::Other("Pausado".to_owned()).is_finished());
    }

    #[test]
    fn role_parses_wire_values() {
        assert_eq!(Role::from("usuario".to_owned()), Role::Requester);
        assert_eq!(Role::from("tecnico".to_owned()), Role::Technician);
        assert_eq!(
            Role::from("gestor".to_owned()),
            Role::Other("gestor".to_owned())
        );
    }

    #[test]
    fn derived_title_prefers_explicit_title() {
        let draft = draft_with("Impressora do 3º andar", "Sem toner");
        assert_eq!(draft.derived_title(), "Impressora do 3º andar");
    }

    #[test]
    fn derived_title_falls_back_to_first_description_line() {
        let draft = draft_with("", "Printer broken\nNeeds toner");
        assert_eq!(draft.derived_title(), "Printer broken");
    }

    #[test]
    fn derived_title_falls_back_to_fixed_label_when_everything_is_blank() {
        let draft = draft_with("  ", "\n");
        assert_eq!(draft.derived_title(), FALLBACK_TITLE);
    }

    #[test]
    fn derived_title_truncates_by_characters_not_bytes() {
        let long = "é".repeat(80);
        let draft = draft_with(&long, "");
        let title = draft.derived_title();
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(title, "é".repeat(MAX_TITLE_CHARS));
    }

    #[test]
    fn created_instant_degrades_to_epoch_for_bad_timestamps() {
        let mut ticket =
            crate::test_support::sample_ticket("t1", Priority::Low, Status::Open, "not-a-date");
        assert_eq!(ticket.created_instant(), DateTime::UNIX_EPOCH);

        ticket.created_at = "2026-08-01T10:00:00Z".to_owned();
        assert!(ticket.created_instant() > DateTime::UNIX_EPOCH);
    }

    #[test]
    fn ticket_deserializes_server_payload() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "title": "Printer broken",
            "description": "Printer broken\nNeeds toner",
            "category": "TI",
            "priority": "Alta",
            "status": "Aberto",
            "location": "Geral",
            "requester_name": "Ana",
            "requester_sector": "Enfermagem",
            "assigned_to": null,
            "user_id": "u1",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-01T10:00:00Z"
        }))
        .expect("deserialize ticket");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.assigned_to, None);
    }
}
