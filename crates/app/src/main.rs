use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{DatabaseStore, Filter, Item, ItemStore, MemoryStore, Money, Sort, Tracker, User};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod confirm;
mod settings;

use confirm::Confirmation;

#[derive(Parser, Debug)]
#[command(name = "finding_tory")]
#[command(about = "Keep track of the things you own")]
struct Cli {
    /// Settings file, without extension.
    #[arg(long, default_value = "settings")]
    config: String,

    /// User whose inventories are used (also read from `FINDING_TORY_USER`).
    #[arg(long, env = "FINDING_TORY_USER")]
    user: String,

    /// Inventory to work on.
    #[arg(long, short, default_value = "Home")]
    inventory: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an item.
    Add(ItemArgs),
    /// Add an item, refusing a serial number already in the inventory.
    Import(ItemArgs),
    /// Show the items matching the given filter, in the given order.
    List(ListArgs),
    /// Remove the first item with the given description.
    Remove(RemoveArgs),
    /// Show every tag used in the inventory.
    Tags,
    /// Show the stored inventories of the user.
    Inventories,
}

#[derive(Args, Debug)]
struct ItemArgs {
    /// Purchase date, `YYYY-MM-DD`.
    #[arg(long)]
    date: String,
    #[arg(long)]
    description: String,
    /// Estimated value, e.g. `12.50`.
    #[arg(long, allow_negative_numbers = true)]
    value: String,
    #[arg(long, default_value = "")]
    make: String,
    #[arg(long, default_value = "")]
    model: String,
    #[arg(long, default_value = "")]
    serial: String,
    #[arg(long, default_value = "")]
    comment: String,
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Earliest purchase date, `YYYY-MM-DD`. Requires `--to`.
    #[arg(long, requires = "to")]
    from: Option<chrono::NaiveDate>,
    /// Latest purchase date, `YYYY-MM-DD`. Requires `--from`.
    #[arg(long, requires = "from")]
    to: Option<chrono::NaiveDate>,
    /// Substring of the description.
    #[arg(long, default_value = "")]
    description: String,
    /// Substring of the make.
    #[arg(long, default_value = "")]
    make: String,
    /// Tag every listed item must carry. Repeatable.
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Field to sort by.
    #[arg(long, default_value = "")]
    sort: String,
    /// `ascending` or `descending`.
    #[arg(long, default_value = "ascending")]
    direction: String,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    description: String,
    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

async fn open_sqlite(
    path: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let database = sea_orm::Database::connect(format!("sqlite:{path}?mode=rwc")).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finding_tory={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let result = match &settings.database {
        Database::Memory => {
            tracing::info!("using in-memory store, nothing is kept after exit");
            run(MemoryStore::new(), cli).await
        }
        Database::Sqlite(path) => {
            let db = open_sqlite(path).await?;
            let store = DatabaseStore::new(db).read_only(settings.read_only);
            run(store, cli).await
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run<S: ItemStore>(store: S, cli: Cli) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut tracker = Tracker::builder().store(store).build()?;
    tracker.login(User::new(cli.user.clone(), cli.user, ""))?;
    let id = tracker.open_inventory(&cli.inventory).await?;

    match cli.command {
        Command::Add(args) => {
            let item = new_item(args)?;
            let description = item.description.clone();
            tracker.add_item(id, item).await?;
            println!("added: {description}");
        }
        Command::Import(args) => {
            let item = new_item(args)?;
            let description = item.description.clone();
            tracker.import_item(id, item).await?;
            println!("imported: {description}");
        }
        Command::List(args) => {
            let filter = Filter::new()
                .date_range(args.from, args.to)
                .description(args.description)
                .make(args.make)
                .required_tags(args.tags);
            let inventory = tracker.inventory_mut(id)?;
            inventory.apply_filter(filter)?;
            inventory.set_sort(Sort::parse(&args.sort, &args.direction));
            inventory.sort_items();

            let shown = inventory.displayed_items();
            for item in &shown {
                print_item(item);
            }
            let total: Money = shown.iter().map(|item| &item.estimated_value).sum();
            println!(
                "{} of {} items, {total} of {} total",
                shown.len(),
                inventory.count(),
                inventory.value()
            );
        }
        Command::Remove(args) => {
            let Some(item) = tracker
                .inventory(id)?
                .items()
                .iter()
                .find(|item| item.description == args.description)
                .cloned()
            else {
                eprintln!("no item described as \"{}\"", args.description);
                std::process::exit(1);
            };

            let answer = if args.yes {
                Confirmation::Confirmed
            } else {
                confirm::ask(&format!("Remove \"{}\"?", item.description))?
            };
            match answer {
                Confirmation::Confirmed => {
                    tracker.remove_item(id, &item).await?;
                    println!("removed: {}", item.description);
                }
                Confirmation::Dismissed => println!("kept: {}", item.description),
            }
        }
        Command::Tags => {
            for tag in tracker.inventory(id)?.all_tags() {
                println!("{tag}");
            }
        }
        Command::Inventories => {
            for name in tracker.stored_inventories().await? {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn new_item(args: ItemArgs) -> Result<Item, engine::EngineError> {
    Ok(Item::check_input(&args.date, &args.description, &args.value)?
        .into_item(args.make, args.model, args.serial, args.comment)
        .tags(args.tags)
        .count(args.count))
}

fn print_item(item: &Item) {
    let mut line = format!(
        "{}  {:<24} {:>10}",
        item.purchase_date, item.description, item.estimated_value
    );
    for field in [&item.make, &item.model, &item.serial_number] {
        if !field.is_empty() {
            line.push_str("  ");
            line.push_str(field);
        }
    }
    if item.item_count != 1 {
        line.push_str(&format!("  x{}", item.item_count));
    }
    if !item.item_tags.is_empty() {
        let tags: Vec<_> = item.item_tags.iter().map(String::as_str).collect();
        line.push_str(&format!("  [{}]", tags.join(", ")));
    }
    println!("{line}");
}
