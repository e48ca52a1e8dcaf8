use crate::cli::parser::Cli;
use crate::cli::commands::{open_pool, request_time};
use crate::cli::parser::{AgentAction, Commands};
use crate::config::Config;
use crate::core::agents::AgentLogic;
use crate::errors::AppResult;
use crate::models::agent::Agent;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, color_for_status, paint};
use crate::utils::formatting::{format_opt_coord, local_datetime};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Agent { action } = &cli.command else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        AgentAction::Register { name } => {
            let (agent, token) = AgentLogic::register(&mut pool, name, request_time(cli)?)?;
            success(format!("Registered agent #{} '{}'", agent.id, agent.name));
            println!("token: {}", token);
        }
        AgentAction::List { all } => {
            let agents = AgentLogic::list(&pool, *all)?;
            if agents.is_empty() {
                info("No agents registered.");
            } else {
                print_agents(&agents);
            }
        }
        AgentAction::Show { id } => {
            let agent = AgentLogic::get(&pool, *id)?;
            print_agent(&agent);
        }
        AgentAction::Deactivate { id } => {
            let agent = AgentLogic::deactivate(&mut pool, *id)?;
            success(format!("Agent #{} '{}' deactivated", agent.id, agent.name));
        }
        AgentAction::Reactivate { id } => {
            let agent = AgentLogic::reactivate(&mut pool, *id)?;
            success(format!("Agent #{} '{}' reactivated", agent.id, agent.name));
        }
        AgentAction::RotateToken { id } => {
            let token = AgentLogic::rotate_token(&mut pool, *id, request_time(cli)?)?;
            success(format!("Issued a new credential for agent #{}", id));
            println!("token: {}", token);
        }
    }

    Ok(())
}

fn status_cell(agent: &Agent) -> String {
    if agent.active {
        paint(color_for_status(agent.status), agent.status.to_db_str())
    } else {
        paint(GREY, "INACTIVE")
    }
}

fn print_agents(agents: &[Agent]) {
    let mut table = Table::new(vec![
        Column::new("ID", 2),
        Column::new("NAME", 4),
        Column::new("STATUS", 8),
        Column::new("LAST POSITION", 13),
        Column::new("LAST SEEN", 9),
    ]);

    for a in agents {
        table.add_row(vec![
            a.id.to_string(),
            a.name.clone(),
            status_cell(a),
            format_opt_coord(a.last_position.as_ref()),
            local_datetime(a.last_seen_at.as_ref()),
        ]);
    }

    print!("{}", table.render());
}

pub(crate) fn print_agent(agent: &Agent) {
    header(format!("Agent #{} {}", agent.id, agent.name));
    println!("Status        : {}", status_cell(agent));
    println!("Last position : {}", format_opt_coord(agent.last_position.as_ref()));
    println!("Last seen     : {}", local_datetime(agent.last_seen_at.as_ref()));
    println!(
        "Duty started  : {} @ {}",
        local_datetime(agent.duty_started_at.as_ref()),
        format_opt_coord(agent.duty_start_position.as_ref())
    );
    println!(
        "Duty ended    : {} @ {}",
        local_datetime(agent.duty_ended_at.as_ref()),
        format_opt_coord(agent.duty_end_position.as_ref())
    );
}
