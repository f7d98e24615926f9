//! Commands that modify the item collection

use clap::Subcommand;
use treestore_core::{Item, ItemId, TreeStore};

use crate::output::format_items;
use crate::AppContext;

#[derive(Subcommand)]
pub enum EditCommands {
    /// Add an item given as JSON, e.g. '{"id": 5, "parent": 1}'
    Add {
        /// Item JSON
        item: String,
        /// Write the result back to the input file
        #[arg(short, long)]
        write: bool,
    },
    /// Remove an item together with all of its descendants
    Remove {
        /// Item id
        id: ItemId,
        /// Write the result back to the input file
        #[arg(short, long)]
        write: bool,
    },
    /// Replace an existing item given as JSON
    Update {
        /// Item JSON
        item: String,
        /// Write the result back to the input file
        #[arg(short, long)]
        write: bool,
    },
}

pub fn run(command: &EditCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let mut store = ctx.load_store()?;

    let write = match command {
        EditCommands::Add { item, write } => {
            let item = Item::from_json(item)?;
            store.add_item(item)?;
            tracing::info!("Added item, {} items total", store.len());
            *write
        }
        EditCommands::Remove { id, write } => {
            let removed = store.remove_item(id);
            tracing::info!("Removed {} items under {}", removed.len(), id);
            *write
        }
        EditCommands::Update { item, write } => {
            let item = Item::from_json(item)?;
            store.update_item(item)?;
            *write
        }
    };

    if write {
        ctx.save_store(&store)
    } else {
        print_store(&store, ctx)
    }
}

fn print_store(store: &TreeStore<Item>, ctx: &AppContext) -> anyhow::Result<()> {
    let items: Vec<&Item> = store.iter().collect();
    println!("{}", format_items(&items, ctx.format)?);
    Ok(())
}
