use crate::model::{Priority, Status, Ticket};

pub(crate) fn sample_ticket(
    id: &str,
    priority: Priority,
    status: Status,
    created_at: &str,
) -> Ticket {
    Ticket {
        id: id.to_owned(),
        title: format!("Chamado {id}"),
        description: "desc".to_owned(),
        category: "TI".to_owned(),
        priority,
        status,
        location: "Geral".to_owned(),
        requester_name: "Ana".to_owned(),
        requester_sector: None,
        assigned_to: None,
        user_id: "u1".to_owned(),
        created_at: created_at.to_owned(),
        updated_at: created_at.to_owned(),
    }
}
