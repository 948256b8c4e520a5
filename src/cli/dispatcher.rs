use crate::api::OsTicketClient;
use crate::api::models::{CloseTicketParams, CreateTicketParams, CreateUserParams};
use crate::cli::main_types::{
    Commands, ConfigCommands, InfoCommands, TicketCommands, UserCommands,
};
use crate::display;
use crate::error::{AppError, CliError, ConfigError};
use crate::storage::config::{Config, ENV_API_KEY, ENV_BASE_URL, mask_api_key};
use crate::utils::logging::print_verbose;
use crate::utils::validation::{validate_date, validate_url};
use serde_json::json;
use std::path::PathBuf;

/// Routes parsed commands to API calls and renders their results.
///
/// Holds the loaded configuration for the whole process run; command
/// handlers decide presentation, `main` decides the exit code.
pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            config,
            config_path,
            verbose,
        }
    }

    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    /// Builds a client from the resolved credentials, refusing before any
    /// network traffic if either value is missing.
    fn client(&self) -> Result<OsTicketClient, AppError> {
        if !self.config.is_configured() {
            return Err(ConfigError::not_configured().into());
        }
        Ok(OsTicketClient::new(
            self.config.base_url(),
            self.config.api_key(),
        )?)
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => self.handle_config_command(command),
            Commands::Ticket { command } => self.handle_ticket_command(command).await,
            Commands::User { command } => self.handle_user_command(command).await,
            Commands::Info { command } => self.handle_info_command(command).await,
        }
    }

    fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Set { url, key } => {
                if url.is_none() && key.is_none() {
                    println!("Please provide --url and/or --key");
                    return Ok(());
                }
                if let Some(url) = url {
                    validate_url(&url)?;
                    self.config.base_url = url;
                    self.config.save(self.config_path.clone())?;
                    println!("✓ Base URL set");
                }
                if let Some(key) = key {
                    self.config.api_key = key;
                    self.config.save(self.config_path.clone())?;
                    println!("✓ API key set");
                }
                Ok(())
            }
            ConfigCommands::Show => {
                let url = self.config.base_url();
                let key = self.config.api_key();

                let url_display = if url.is_empty() {
                    "(not set)".to_string()
                } else {
                    url
                };
                let key_display = if key.is_empty() {
                    "(not set)".to_string()
                } else {
                    mask_api_key(&key)
                };

                let config_file = match &self.config_path {
                    Some(p) => p.clone(),
                    None => Config::config_file_path()?,
                };

                println!("\nConfiguration:");
                println!("  Base URL: {} [{}]", url_display, self.config.base_url_source());
                println!("  API Key:  {} [{}]", key_display, self.config.api_key_source());
                println!("  Config file: {}", config_file.display());
                println!("\n  Environment variables:");
                println!("    {}", ENV_BASE_URL);
                println!("    {}\n", ENV_API_KEY);
                Ok(())
            }
            ConfigCommands::Clear => {
                self.config.clear();
                self.config.save(self.config_path.clone())?;
                println!("✓ Configuration cleared");
                Ok(())
            }
        }
    }

    async fn handle_ticket_command(&self, command: TicketCommands) -> Result<(), AppError> {
        match command {
            TicketCommands::Get { id, raw } => {
                let client = self.client()?;
                self.log_verbose(&format!("Fetching ticket {}", id));

                if raw {
                    println!("{}", client.get_ticket_raw(&id).await?);
                    return Ok(());
                }

                let data = client.get_ticket(&id).await?;
                display::print_json(&data)
            }
            TicketCommands::Search {
                number,
                email,
                phone,
                status,
                from,
                to,
                json,
                raw,
            } => {
                if let Some(number) = number {
                    return self.search_by_number(&number, raw).await;
                }
                if let Some(email) = email {
                    return self.search_by_email(&email, json, raw).await;
                }
                if phone.is_some() {
                    println!(
                        "Phone search requires user lookup. Please search by email or ticket number instead."
                    );
                    return Ok(());
                }
                self.search_by_status_or_date(status, from, to, json, raw)
                    .await
            }
            TicketCommands::Create {
                title,
                subject,
                user_id,
                priority,
                status,
                dept,
                sla,
                topic,
                json,
            } => {
                let client = self.client()?;
                let params = CreateTicketParams {
                    title,
                    subject,
                    user_id,
                    priority_id: priority,
                    status_id: status,
                    dept_id: dept,
                    sla_id: sla,
                    topic_id: topic,
                };

                let ticket_id = client.create_ticket(&params).await?;

                if json {
                    return display::print_json(&json!({ "ticket_id": ticket_id }));
                }
                println!("\n✓ Ticket created successfully!");
                println!("  Ticket ID: {}", ticket_id);
                Ok(())
            }
            TicketCommands::Reply {
                ticket_id,
                body,
                staff_id,
                json,
            } => {
                let client = self.client()?;
                client.reply_to_ticket(ticket_id, &body, staff_id).await?;

                if json {
                    return display::print_json(&json!({ "status": "success" }));
                }
                println!("\n✓ Reply sent successfully!");
                Ok(())
            }
            TicketCommands::Close {
                ticket_id,
                body,
                staff_id,
                username,
                status,
                team,
                dept,
                topic,
                json,
            } => {
                let client = self.client()?;
                let params = CloseTicketParams {
                    ticket_id,
                    body,
                    staff_id,
                    status_id: status,
                    team_id: team,
                    dept_id: dept,
                    topic_id: topic,
                    username,
                };

                client.close_ticket(&params).await?;

                if json {
                    return display::print_json(&json!({ "status": "success" }));
                }
                println!("\n✓ Ticket closed successfully!");
                Ok(())
            }
        }
    }

    async fn search_by_number(&self, number: &str, raw: bool) -> Result<(), AppError> {
        let client = self.client()?;
        if raw {
            println!("{}", client.get_ticket_raw(number).await?);
            return Ok(());
        }
        let data = client.get_ticket(number).await?;
        display::print_json(&data)
    }

    async fn search_by_email(&self, email: &str, json: bool, raw: bool) -> Result<(), AppError> {
        let client = self.client()?;
        self.log_verbose(&format!("Searching tickets for {}", email));

        if raw {
            // Raw mode shows both halves of the composite lookup.
            println!("=== User Response ===");
            println!("{}", client.get_user_by_email_raw(email).await?);
            println!("\n=== Tickets Response ===");
            println!("{}", client.get_tickets_by_status_raw(0).await?);
            return Ok(());
        }

        let (data, user) = client.search_tickets_by_email(email).await?;

        if json {
            let mut response = json!({
                "total": data.total,
                "tickets": data.tickets,
            });
            if let Some(user) = &user {
                response["user"] = json!({
                    "user_id": user.user_id,
                    "name": user.name,
                    "created": user.created,
                });
            }
            return display::print_json(&response);
        }

        match &user {
            Some(user) => println!("Tickets for {} (user {}):", user.name, user.user_id),
            None => println!("No user found for {}", email),
        }
        println!("{}", display::render_ticket_summary(&data.tickets));
        Ok(())
    }

    async fn search_by_status_or_date(
        &self,
        status: i64,
        from: Option<String>,
        to: Option<String>,
        json: bool,
        raw: bool,
    ) -> Result<(), AppError> {
        let client = self.client()?;

        let date_range = match (from, to) {
            (Some(from), Some(to)) => {
                validate_date(&from, "--from")?;
                validate_date(&to, "--to")?;
                Some((from, to))
            }
            (None, None) => None,
            _ => {
                return Err(CliError::InvalidArguments(
                    "Date search requires both --from and --to".to_string(),
                )
                .into());
            }
        };

        if raw {
            let body = match &date_range {
                Some((from, to)) => client.get_tickets_by_date_range_raw(from, to).await?,
                None => client.get_tickets_by_status_raw(status).await?,
            };
            println!("{}", body);
            return Ok(());
        }

        let data = match &date_range {
            Some((from, to)) => client.get_tickets_by_date_range(from, to).await?,
            None => client.get_tickets_by_status(status).await?,
        };

        if json {
            return display::print_json(&data);
        }
        println!("{}", display::render_ticket_summary(&data.tickets));
        Ok(())
    }

    async fn handle_user_command(&self, command: UserCommands) -> Result<(), AppError> {
        match command {
            UserCommands::Get { id, email, json } => {
                let client = self.client()?;

                let data = match (id, email) {
                    (Some(id), _) => client.get_user_by_id(&id).await?,
                    (None, Some(email)) => client.get_user_by_email(&email).await?,
                    (None, None) => {
                        return Err(CliError::InvalidArguments(
                            "Please provide --id or --email".to_string(),
                        )
                        .into());
                    }
                };

                if json {
                    return display::print_json(&data);
                }
                if data.users.is_empty() {
                    println!("No user found");
                    return Ok(());
                }
                println!("{}", display::render_users(&data.users));
                Ok(())
            }
            UserCommands::Create {
                name,
                email,
                password,
                phone,
                timezone,
                org_id,
                json,
            } => {
                let client = self.client()?;
                let params = CreateUserParams {
                    name,
                    email,
                    password,
                    phone,
                    timezone,
                    org_id,
                    default_email_id: 0,
                    status: 1,
                };

                let user_id = client.create_user(&params).await?;

                if json {
                    return display::print_json(&json!({ "user_id": user_id }));
                }
                println!("\n✓ User created successfully!");
                println!("  User ID: {}", user_id);
                Ok(())
            }
        }
    }

    async fn handle_info_command(&self, command: InfoCommands) -> Result<(), AppError> {
        let client = self.client()?;
        self.log_verbose(&format!("Fetching system information: {:?}", command));
        match command {
            InfoCommands::Departments { json } => {
                let data = client.get_departments().await?;
                if json {
                    return display::print_json(&data);
                }
                println!("{}", display::render_departments(&data.departments));
                Ok(())
            }
            InfoCommands::Topics { json } => {
                let data = client.get_topics().await?;
                if json {
                    return display::print_json(&data);
                }
                println!("{}", display::render_topics(&data.topics));
                Ok(())
            }
            InfoCommands::Sla { json } => {
                let data = client.get_slas().await?;
                if json {
                    return display::print_json(&data);
                }
                println!("{}", display::render_slas(&data.sla));
                Ok(())
            }
        }
    }
}
