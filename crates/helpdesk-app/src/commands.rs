//! Subcommand execution against the shared session store, plus the
//! text rendering of the triaged dashboard.

use helpdesk_api::{ApiError, SignUpRequest, UpdateProfileRequest};
use helpdesk_core::{
    Priority, Role, Status, TicketBoard, TicketDraft, TriageRow, TriageView, User,
    TECHNICIAN_SECTOR,
};
use helpdesk_session::SessionStore;

pub const DEFAULT_CATEGORY: &str = "TI";
pub const DEFAULT_LOCATION: &str = "Geral";
pub const DEFAULT_REQUESTER: &str = "Usuário";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignUp {
        email: String,
        password: String,
        name: String,
        technician: bool,
        sector: Option<String>,
    },
    Login {
        email: String,
        password: String,
        technician: bool,
    },
    Logout,
    WhoAmI,
    Account {
        name: Option<String>,
        sector: Option<String>,
    },
    List {
        include_finished: bool,
    },
    Create {
        description: String,
        title: Option<String>,
        category: Option<String>,
        priority: Option<Priority>,
        location: Option<String>,
    },
    Start {
        ticket_id: String,
    },
    Finish {
        ticket_id: String,
    },
}

pub async fn execute(session: &SessionStore, command: Command) -> Result<String, ApiError> {
    match command {
        Command::SignUp {
            email,
            password,
            name,
            technician,
            sector,
        } => {
            // Technician accounts always belong to the fixed IT sector.
            let (role, sector) = if technician {
                (Role::Technician, Some(TECHNICIAN_SECTOR.to_owned()))
            } else {
                (Role::Requester, sector)
            };
            let user = session
                .sign_up(SignUpRequest {
                    email,
                    password,
                    name,
                    role,
                    sector,
                })
                .await?;
            Ok(match user {
                Some(user) => format!("Conta criada. Bem-vindo(a), {}!", user.display_name()),
                None => "Conta criada. Faça login para continuar.".to_owned(),
            })
        }
        Command::Login {
            email,
            password,
            technician,
        } => {
            let role = if technician {
                Role::Technician
            } else {
                Role::Requester
            };
            let user = session.sign_in(&email, &password, Some(role)).await?;
            Ok(match user {
                Some(user) => format!("Bem-vindo(a), {}!", user.display_name()),
                None => "Login efetuado.".to_owned(),
            })
        }
        Command::Logout => {
            session.sign_out().await?;
            Ok("Sessão encerrada.".to_owned())
        }
        Command::WhoAmI => Ok(match session.refresh().await? {
            Some(user) => render_user(&user),
            None => "Nenhuma sessão ativa.".to_owned(),
        }),
        Command::Account { name, sector } => {
            let current = session.refresh().await?.ok_or_else(|| {
                ApiError::Validation("Faça login para editar o perfil".to_owned())
            })?;
            if current.is_technician() && sector.is_some() {
                return Err(ApiError::Validation(
                    "Técnicos não podem alterar o setor".to_owned(),
                ));
            }
            if name.is_none() && sector.is_none() {
                return Ok(render_user(&current));
            }
            let updated = session
                .update_profile(UpdateProfileRequest { name, sector })
                .await?;
            Ok(format!("Perfil atualizado.\n{}", render_user(&updated)))
        }
        Command::List { include_finished } => {
            let user = session.refresh().await?.ok_or_else(|| {
                ApiError::Validation("Faça login para listar chamados".to_owned())
            })?;
            let tickets = session.api().list_tickets().await?;
            let mut board = TicketBoard::new(include_finished);
            board.replace_all(tickets);
            Ok(render_board(&board.view(user.is_technician())))
        }
        Command::Create {
            description,
            title,
            category,
            priority,
            location,
        } => {
            let user = session.refresh().await?.ok_or_else(|| {
                ApiError::Validation("Faça login para abrir um chamado".to_owned())
            })?;
            let draft = draft_for(&user, description, title, category, priority, location);
            let ticket = session.api().create_ticket(draft).await?;
            Ok(format!("Chamado {} criado: {}", ticket.id, ticket.title))
        }
        Command::Start { ticket_id } => {
            let ticket = session
                .api()
                .update_ticket_status(&ticket_id, Status::InProgress)
                .await?;
            Ok(format!(
                "Chamado {} agora está {}.",
                ticket.id,
                ticket.status.wire_value()
            ))
        }
        Command::Finish { ticket_id } => {
            let ticket = session
                .api()
                .update_ticket_status(&ticket_id, Status::Resolved)
                .await?;
            Ok(format!(
                "Chamado {} agora está {}.",
                ticket.id,
                ticket.status.wire_value()
            ))
        }
    }
}

fn draft_for(
    user: &User,
    description: String,
    title: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    location: Option<String>,
) -> TicketDraft {
    let requester_name = if user.display_name().trim().is_empty() {
        DEFAULT_REQUESTER.to_owned()
    } else {
        user.display_name().to_owned()
    };
    TicketDraft {
        title: title.unwrap_or_default(),
        description,
        category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
        priority: priority.unwrap_or_default(),
        location: location.unwrap_or_else(|| DEFAULT_LOCATION.to_owned()),
        requester_name,
        requester_sector: user.sector_label().map(str::to_owned),
        responsible_name: None,
    }
}

pub fn parse_priority(value: &str) -> Result<Priority, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "urgente" => Ok(Priority::Urgent),
        "alta" => Ok(Priority::High),
        "media" | "média" => Ok(Priority::Medium),
        "baixa" => Ok(Priority::Low),
        other => Err(ApiError::Validation(format!(
            "Prioridade desconhecida '{other}'. Use urgente, alta, média ou baixa."
        ))),
    }
}

fn render_user(user: &User) -> String {
    let role = match &user.role {
        Role::Requester => "Usuário",
        Role::Technician => "Técnico",
        Role::Other(raw) => raw.as_str(),
    };
    let mut out = format!("{} <{}>\nPerfil: {}", user.display_name(), user.email, role);
    if let Some(sector) = user.sector_label() {
        out.push_str(&format!("\nSetor: {sector}"));
    }
    out
}

pub fn render_board(view: &TriageView) -> String {
    if view.row_count() == 0 {
        return "Nenhum chamado para exibir.".to_owned();
    }
    let mut out = String::new();
    for group in &view.groups {
        if group.rows.is_empty() {
            continue;
        }
        if let Some(stage) = group.stage {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(stage.header());
            out.push('\n');
        }
        for row in &group.rows {
            out.push_str(&render_row(row));
            out.push('\n');
        }
    }
    out.trim_end().to_owned()
}

fn render_row(row: &TriageRow) -> String {
    let ticket = &row.ticket;
    let mut line = format!(
        "  {}  [{}]  {}  ({})  {}",
        ticket.id,
        ticket.priority.wire_value(),
        ticket.title,
        ticket.status.wire_value(),
        ticket.created_at
    );
    let mut actions = Vec::new();
    if row.actions.start_progress {
        actions.push("start");
    }
    if row.actions.finish {
        actions.push("finish");
    }
    if !actions.is_empty() {
        line.push_str(&format!("  ações: {}", actions.join(", ")));
    }
    line
}
