use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contacts_client::{ContactsClient, DEFAULT_BASE_URL};
use contacts_common::{Contact, ContactId};
use tracing::debug;

/// Contacts directory command-line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Registry base URL
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a contact, or update it when --id is given
    Upsert {
        /// Existing contact id (omit to create a new contact)
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        surname: String,

        #[arg(long)]
        company: Option<String>,

        /// Email address (repeat for several, order is kept)
        #[arg(long = "email", value_name = "EMAIL")]
        emails: Vec<String>,
    },

    /// Show one contact
    Get {
        id: i64,
    },

    /// Print every contact, one JSON document per line
    List,

    /// Register the Paul Appleseed example contact
    RegisterExample,

    /// Check that the registry is reachable
    Health,
}

impl Command {
    fn into_contact(self) -> Option<Contact> {
        match self {
            Command::Upsert { id, name, surname, company, emails } => Some(Contact {
                id: id.map(ContactId::new),
                name,
                surname,
                company,
                emails,
            }),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.debug);

    let client = ContactsClient::new(&args.url);
    debug!("Using registry at {}", client.base_url());

    match args.command {
        Command::Get { id } => {
            let contact = client.get_contact(ContactId::new(id)).await?;
            match contact {
                Some(contact) => println!("{}", serde_json::to_string_pretty(&contact)?),
                None => println!("Contact {} not found", id),
            }
        }

        Command::List => {
            let contacts = client.list_contacts().await?;
            for contact in &contacts {
                println!("{}", serde_json::to_string(contact)?);
            }
            debug!("Listed {} contacts", contacts.len());
        }

        Command::RegisterExample => {
            let stored = client
                .register_example_contact()
                .await
                .context("Failed to register example contact")?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }

        Command::Health => {
            client.health().await.context("Registry is not healthy")?;
            println!("OK");
        }

        upsert @ Command::Upsert { .. } => {
            if let Some(contact) = upsert.into_contact() {
                let stored = client
                    .upsert_contact(&contact)
                    .await
                    .context("Failed to upsert contact")?;
                println!("{}", serde_json::to_string_pretty(&stored)?);
            }
        }
    }

    Ok(())
}

fn initialize_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
