//! `fieldops`: command-line front end of the equipment ledger.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use fieldops_clients::Client;
use fieldops_core::{ClientId, ItemId, SystemClock, ThreadRandom, UuidAllocator};
use fieldops_infra::{ItemDraft, JsonFileStore, LedgerConfig, LedgerService};
use fieldops_inventory::{Actor, AssignPayload, LifecycleAction, MaintenancePayload};

type Service = LedgerService<JsonFileStore, SystemClock, UuidAllocator, ThreadRandom>;

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(about = "Equipment lifecycle and assignment ledger")]
#[command(version)]
struct Cli {
    /// Data directory (overrides FIELDOPS_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List inventory items
    Items,

    /// List clients
    Clients,

    /// Register one item by hand
    Register {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        serial: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long)]
        actor: String,
    },

    /// Assign an item to a client
    Assign {
        item: String,
        /// Client id; omit for a free-text destination
        #[arg(long)]
        client: Option<String>,
        /// Display label of the destination (defaults to the client name)
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        receiver: String,
        /// Issuing supervisor
        #[arg(long)]
        actor: String,
        #[arg(long)]
        observations: Option<String>,
    },

    /// Send an item to a workshop
    Maintenance {
        item: String,
        #[arg(long)]
        workshop: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        observations: Option<String>,
        #[arg(long)]
        photo: Option<String>,
    },

    /// Return an item to the pool
    Release {
        item: String,
        #[arg(long)]
        actor: String,
    },

    /// Retire an item (administrators only)
    Retire {
        item: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        admin: bool,
    },

    /// Delete an item and its records
    DeleteItem { item: String },

    /// Add a client
    AddClient {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        tax_id: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Delete a client
    DeleteClient { client: String },

    /// Bulk-load inventory from a CSV file
    ImportInventory { file: PathBuf },

    /// Bulk-upsert clients from a CSV file
    ImportClients { file: PathBuf },

    /// Equipment history of a client
    History { client: String },

    /// Status timeline of one item
    Timeline { item: String },
}

fn main() -> Result<()> {
    fieldops_observability::init();

    let cli = Cli::parse();
    let mut config = LedgerConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let store = JsonFileStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    tracing::debug!(data_dir = %config.data_dir.display(), "ledger store opened");
    let mut service: Service =
        LedgerService::new(store, SystemClock, UuidAllocator, ThreadRandom, config);

    run(&mut service, cli.command)
}

fn run(service: &mut Service, command: Commands) -> Result<()> {
    match command {
        Commands::Items => print(&service.list_items()?),
        Commands::Clients => print(&service.list_clients()?),
        Commands::Register {
            name,
            serial,
            description,
            image_url,
            actor,
        } => {
            let draft = ItemDraft {
                name,
                description,
                serial_number: serial,
                image_url,
            };
            print(&service.register_item(draft, &actor)?)
        }
        Commands::Assign {
            item,
            client,
            label,
            receiver,
            actor,
            observations,
        } => {
            let subject_id = client.map(ClientId::from);
            let subject_label = match (label, &subject_id) {
                (Some(label), _) => label,
                (None, Some(id)) => client_name(service, id)?,
                (None, None) => anyhow::bail!("either --client or --label is required"),
            };
            let action = LifecycleAction::Assign(AssignPayload {
                subject_id,
                subject_label,
                receiving_party_name: receiver,
                observations,
            });
            print(&service.transition_item(&ItemId::from(item), action, Actor::new(actor))?)
        }
        Commands::Maintenance {
            item,
            workshop,
            receiver,
            reason,
            actor,
            observations,
            photo,
        } => {
            let action = LifecycleAction::SendToMaintenance(MaintenancePayload {
                workshop_name: workshop,
                receiver_name: receiver,
                reason,
                observations,
                photo,
            });
            print(&service.transition_item(&ItemId::from(item), action, Actor::new(actor))?)
        }
        Commands::Release { item, actor } => print(&service.transition_item(
            &ItemId::from(item),
            LifecycleAction::Release,
            Actor::new(actor),
        )?),
        Commands::Retire { item, actor, admin } => {
            let actor = if admin {
                Actor::privileged(actor)
            } else {
                Actor::new(actor)
            };
            print(&service.transition_item(&ItemId::from(item), LifecycleAction::Retire, actor)?)
        }
        Commands::DeleteItem { item } => {
            service.delete_item(&ItemId::from(item))?;
            Ok(())
        }
        Commands::AddClient {
            name,
            tax_id,
            email,
            phone,
        } => {
            let mut client = Client::new(ClientId::from(""), name, "");
            client.tax_id = tax_id;
            client.email = email;
            client.phone = phone;
            print(&service.add_client(client)?)
        }
        Commands::DeleteClient { client } => {
            service.delete_client(&ClientId::from(client))?;
            Ok(())
        }
        Commands::ImportInventory { file } => {
            let text = read(&file)?;
            print(&service.import_inventory_csv(&text)?)
        }
        Commands::ImportClients { file } => {
            let text = read(&file)?;
            print(&service.import_clients_csv(&text)?)
        }
        Commands::History { client } => print(&service.client_history(&ClientId::from(client))?),
        Commands::Timeline { item } => print(&service.item_timeline(&ItemId::from(item))?),
    }
}

fn client_name(service: &Service, id: &ClientId) -> Result<String> {
    service
        .list_clients()?
        .into_iter()
        .find(|c| &c.id == id)
        .map(|c| c.name)
        .with_context(|| format!("unknown client {id}"))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
