use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pn_notes::{ListFilter, NoteService};
use pn_store::{NoteRecord, Store, StoreOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "pnotes")]
#[command(about = "Local note store with optional per-note encryption", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.pnotes)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, most recently updated first
    List {
        #[arg(long)]
        json: bool,
        /// Only notes carrying this tag (repeatable; any one matches)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Only encrypted notes
        #[arg(long, conflicts_with = "plain")]
        encrypted: bool,
        /// Only unencrypted notes
        #[arg(long)]
        plain: bool,
    },

    /// List every tag in use
    Tags {
        #[arg(long)]
        json: bool,
    },

    /// Show one note as stored (encrypted notes stay sealed)
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    Add {
        title: String,
        #[arg(default_value = "")]
        content: String,
        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Encrypt title and content with a password
        #[arg(short, long)]
        encrypt: bool,
    },

    /// Replace a note's title, content and tags
    Edit {
        id: String,
        title: String,
        #[arg(default_value = "")]
        content: String,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Store the new text encrypted
        #[arg(short, long)]
        encrypt: bool,
    },

    /// Print the plaintext of a note
    Decrypt {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete { id: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = match &cli.data_dir {
        Some(dir) => StoreOptions::in_dir(dir),
        None => StoreOptions::default_location()?,
    };
    tracing::debug!(db = %options.db_path.display(), "opening note store");
    let store = Arc::new(
        Store::open(&options)
            .with_context(|| format!("open note store at {}", options.db_path.display()))?,
    );
    let service = NoteService::new(Arc::clone(&store));

    let result = run(&service, cli.command);
    store.close().context("close note store")?;
    result
}

fn run(service: &NoteService, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            json,
            tags,
            encrypted,
            plain,
        } => {
            let state = if encrypted {
                Some(true)
            } else if plain {
                Some(false)
            } else {
                None
            };
            let filter = ListFilter::encrypted(state).with_tags(tags.as_slice());
            let notes = service.list_filtered(&filter)?;
            if json {
                render::print_json(&render::records(notes))?;
            } else {
                render::print_list(&notes);
            }
        }
        Commands::Tags { json } => {
            let tags = service.all_tags()?;
            if json {
                render::print_json(&tags)?;
            } else {
                render::print_tags(&tags);
            }
        }
        Commands::Show { id, json } => {
            let note = service
                .get_note(&id)?
                .ok_or_else(|| anyhow::anyhow!("note not found: {id}"))?;
            if json {
                render::print_json(&NoteRecord::from(note))?;
            } else {
                render::print_note(&note);
            }
        }
        Commands::Add {
            title,
            content,
            tags,
            encrypt,
        } => {
            let note = if encrypt {
                let password = prompt_new_password()?;
                service.create_encrypted_note(&title, &content, &password, tags.as_slice())?
            } else {
                service.create_note(&title, &content, tags.as_slice())?
            };
            println!("{}", note.id);
        }
        Commands::Edit {
            id,
            title,
            content,
            tags,
            encrypt,
        } => {
            let note = if encrypt {
                let password = prompt_new_password()?;
                service.update_encrypted_note(&id, &title, &content, &password, tags.as_slice())?
            } else {
                service.update_note(&id, &title, &content, tags.as_slice())?
            };
            println!("{}", note.id);
        }
        Commands::Decrypt { id, json } => {
            let password = rpassword::prompt_password("Password: ")?;
            let note = service.decrypt_note(&id, &password)?;
            if json {
                render::print_json(&note)?;
            } else {
                render::print_decrypted(&note);
            }
        }
        Commands::Delete { id } => {
            service.delete_note(&id)?;
        }
    }
    Ok(())
}

fn prompt_new_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("passwords do not match");
    }
    Ok(password)
}
