use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "osticket")]
#[command(about = "CLI tool for interacting with osTicket")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the configuration directory
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage tickets
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Get system information
    Info {
        #[command(subcommand)]
        command: InfoCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set configuration values
    Set {
        /// osTicket API base URL
        #[arg(long)]
        url: Option<String>,
        /// osTicket API key
        #[arg(long)]
        key: Option<String>,
    },
    /// Show the current configuration
    Show,
    /// Clear all configuration
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Get a ticket by ID or ticket number
    Get {
        id: String,
        /// Output raw API response
        #[arg(long)]
        raw: bool,
    },
    /// Search tickets
    Search {
        /// Search by ticket number
        #[arg(long)]
        number: Option<String>,
        /// Search by user email
        #[arg(long)]
        email: Option<String>,
        /// Search by user phone number
        #[arg(long)]
        phone: Option<String>,
        /// Filter by status (0=all, 1=open, 2=resolved, 3=closed)
        #[arg(long, default_value = "0")]
        status: i64,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Output raw API response
        #[arg(long)]
        raw: bool,
    },
    /// Create a new ticket
    Create {
        /// Ticket title
        #[arg(long)]
        title: String,
        /// Ticket subject/body
        #[arg(long)]
        subject: String,
        /// User ID
        #[arg(long)]
        user_id: i64,
        /// Priority ID (1=low, 2=normal, 3=high, 4=emergency)
        #[arg(long, default_value = "2")]
        priority: i64,
        /// Status ID (1=open)
        #[arg(long, default_value = "1")]
        status: i64,
        /// Department ID
        #[arg(long, default_value = "1")]
        dept: i64,
        /// SLA ID
        #[arg(long, default_value = "1")]
        sla: i64,
        /// Topic ID
        #[arg(long, default_value = "1")]
        topic: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reply to a ticket
    Reply {
        ticket_id: i64,
        /// Reply body
        #[arg(long)]
        body: String,
        /// Staff ID
        #[arg(long)]
        staff_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Close a ticket
    Close {
        ticket_id: i64,
        /// Closing message
        #[arg(long)]
        body: String,
        /// Staff ID
        #[arg(long)]
        staff_id: i64,
        /// Username
        #[arg(long)]
        username: String,
        /// Status ID (default: 3 for closed)
        #[arg(long, default_value = "3")]
        status: i64,
        /// Team ID
        #[arg(long, default_value = "0")]
        team: i64,
        /// Department ID
        #[arg(long, default_value = "1")]
        dept: i64,
        /// Topic ID
        #[arg(long, default_value = "1")]
        topic: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Get a user by ID or email
    Get {
        /// User ID
        #[arg(long)]
        id: Option<String>,
        /// User email
        #[arg(long)]
        email: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new user
    Create {
        /// User name
        #[arg(long)]
        name: String,
        /// User email
        #[arg(long)]
        email: String,
        /// User password
        #[arg(long)]
        password: String,
        /// User phone number
        #[arg(long)]
        phone: String,
        /// Timezone
        #[arg(long, default_value = "America/New_York")]
        timezone: String,
        /// Organization ID
        #[arg(long, default_value = "0")]
        org_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum InfoCommands {
    /// List all departments
    Departments {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all help topics
    Topics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all SLA plans
    Sla {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ticket_create_defaults() {
        let cli = Cli::parse_from([
            "osticket", "ticket", "create", "--title", "t", "--subject", "s", "--user-id", "7",
        ]);
        let Commands::Ticket {
            command:
                TicketCommands::Create {
                    priority,
                    status,
                    dept,
                    sla,
                    topic,
                    ..
                },
        } = cli.command
        else {
            panic!("expected ticket create");
        };
        assert_eq!(priority, 2);
        assert_eq!(status, 1);
        assert_eq!(dept, 1);
        assert_eq!(sla, 1);
        assert_eq!(topic, 1);
    }

    #[test]
    fn test_ticket_close_default_status_is_closed() {
        let cli = Cli::parse_from([
            "osticket", "ticket", "close", "12", "--body", "done", "--staff-id", "3",
            "--username", "agent",
        ]);
        let Commands::Ticket {
            command: TicketCommands::Close { status, team, .. },
        } = cli.command
        else {
            panic!("expected ticket close");
        };
        assert_eq!(status, 3);
        assert_eq!(team, 0);
    }
}
