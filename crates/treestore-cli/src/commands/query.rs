//! Read-only commands

use clap::Subcommand;
use treestore_core::{Item, ItemId, TraversalOrder};

use crate::output::{format_item, format_items};
use crate::AppContext;

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Print every item in file order
    List,
    /// Print items without a parent
    Roots,
    /// Print a single item
    Get {
        /// Item id (integers are parsed as numeric ids)
        id: ItemId,
    },
    /// Print the direct children of an item
    Children {
        /// Parent id
        id: ItemId,
    },
    /// Print every descendant of an item
    Descendants {
        /// Subtree root id
        id: ItemId,
        /// Visiting order: stack, pre-order (defaults to config)
        #[arg(long)]
        order: Option<TraversalOrder>,
    },
    /// Print the ancestor chain of an item, root first
    Ancestors {
        /// Item id
        id: ItemId,
    },
}

pub fn run(command: &QueryCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.load_store()?;

    let output = match command {
        QueryCommands::List => {
            let items: Vec<&Item> = store.iter().collect();
            format_items(&items, ctx.format)?
        }
        QueryCommands::Roots => format_items(&store.roots(), ctx.format)?,
        QueryCommands::Get { id } => {
            let item = store.get_item(id);
            if item.is_none() {
                tracing::info!("Item {} not found", id);
            }
            format_item(item, ctx.format)?
        }
        QueryCommands::Children { id } => format_items(&store.get_children(id), ctx.format)?,
        QueryCommands::Descendants { id, order } => {
            let order = order.unwrap_or(ctx.config.order);
            format_items(&store.get_all_children_ordered(id, order), ctx.format)?
        }
        QueryCommands::Ancestors { id } => format_items(&store.get_all_parents(id), ctx.format)?,
    };

    println!("{}", output);
    Ok(())
}
