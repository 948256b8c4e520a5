//! Table rendering for human-readable output.
//!
//! Renderers return the finished table as a `String`; printing is the
//! caller's business. Ticket data keeps its thread-group structure in JSON
//! output, so the table here is a flat summary (first record per group).

use crate::api::models::{Department, Sla, Ticket, Topic, User};
use comfy_table::{Attribute, Cell, Color, Table, presets};

const SUBJECT_MAX_LEN: usize = 37;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

fn status_name(status_id: i64) -> String {
    match status_id {
        1 => "Open".to_string(),
        2 => "Resolved".to_string(),
        3 => "Closed".to_string(),
        4 => "Archived".to_string(),
        5 => "Deleted".to_string(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}

/// Renders one summary row per thread group, using the group's first record.
pub fn render_ticket_summary(tickets: &[Vec<Ticket>]) -> String {
    let mut table = new_table(&["Number", "Subject", "Status", "Created", "User ID"]);

    for group in tickets {
        let Some(t) = group.first() else {
            continue;
        };

        let number = if t.number.is_empty() {
            t.ticket_id.to_string()
        } else {
            t.number.clone()
        };

        table.add_row(vec![
            Cell::new(number),
            Cell::new(truncate(&t.subject, SUBJECT_MAX_LEN)),
            Cell::new(status_name(t.status_id)),
            Cell::new(&t.created),
            Cell::new(t.user_id.to_string()),
        ]);
    }

    format!("{}\n\nTotal: {} ticket(s)", table, tickets.len())
}

pub fn render_users(users: &[User]) -> String {
    let mut table = new_table(&["ID", "Name", "Created"]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.user_id.to_string()),
            Cell::new(&user.name),
            Cell::new(&user.created),
        ]);
    }
    table.to_string()
}

pub fn render_departments(departments: &[Department]) -> String {
    let mut table = new_table(&["ID", "Name"]);
    for dept in departments {
        table.add_row(vec![Cell::new(dept.id.to_string()), Cell::new(&dept.name)]);
    }
    table.to_string()
}

pub fn render_topics(topics: &[Topic]) -> String {
    let mut table = new_table(&["ID", "Topic"]);
    for topic in topics {
        table.add_row(vec![
            Cell::new(topic.topic_id.to_string()),
            Cell::new(&topic.topic),
        ]);
    }
    table.to_string()
}

pub fn render_slas(slas: &[Sla]) -> String {
    let mut table = new_table(&["ID", "Name", "Grace Period"]);
    for sla in slas {
        table.add_row(vec![
            Cell::new(sla.id.to_string()),
            Cell::new(&sla.name),
            Cell::new(sla.grace_period.to_string()),
        ]);
    }
    table.to_string()
}

/// Pretty-prints any serializable value as indented JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> crate::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| {
        crate::error::CliError::InvalidArguments(format!("could not serialize output: {}", e))
    })?;
    println!("{}", rendered);
    Ok(())
}
