// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use pantry::config::{Config, SearchCase};
use pantry::database;
use pantry::database::models::{CategoryId, IngredientId, RecipeId};
use pantry::query::ingredient::{IngredientFilter, IngredientInput};
use pantry::query::{category, ingredient, recipe};
use std::path::PathBuf;
use std::time::Duration;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Database file, defaults to the user data directory.
    #[arg(long, env = "PANTRY_DATABASE")]
    database: Option<PathBuf>,

    /// Match ingredient searches regardless of case.
    #[arg(long, env = "PANTRY_CASE_INSENSITIVE")]
    case_insensitive: bool,

    #[arg(long, env = "PANTRY_CONNECT_ATTEMPTS", default_value_t = Config::DEFAULT_CONNECT_ATTEMPTS)]
    connect_attempts: u32,

    #[arg(long, env = "PANTRY_CONNECT_DELAY_MS", default_value_t = Config::DEFAULT_CONNECT_DELAY_MS)]
    connect_delay_ms: u64,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Categories,
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<CategoryId>,
    },
    Add {
        name: String,
        category: CategoryId,
        quantity: String,
        /// YYYY-MM-DD
        expiry_date: String,
    },
    Edit {
        id: IngredientId,
        name: String,
        category: CategoryId,
        quantity: String,
        expiry_date: String,
    },
    Delete {
        id: IngredientId,
    },
    Recipes,
    AddRecipe {
        title: String,
        #[arg(long, default_value = "")]
        instructions: String,
        /// Category id of a requirement, paired in order with --quantity.
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "quantity")]
        quantities: Vec<String>,
    },
    ShowRecipe {
        id: RecipeId,
    },
    DeleteRecipe {
        id: RecipeId,
    },
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.database {
            Some(path) => Config::new(path),
            None => Config::with_default_path()?,
        };
        if self.case_insensitive {
            config.search_case = SearchCase::Insensitive;
        }
        config.connect_attempts = self.connect_attempts;
        config.connect_delay = Duration::from_millis(self.connect_delay_ms);
        Ok(config)
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn list(
    conn: &mut database::Connection,
    config: &Config,
    search: Option<&str>,
    category_id: Option<CategoryId>,
) -> Result<()> {
    let filter = IngredientFilter {
        search,
        category_id,
        case: config.search_case,
    };
    let report = ingredient::expiry_report(conn, &filter, today())?;

    for item in &report.items {
        println!(
            "{:>4}  {:<20} {:<10} {:<10} {}  {:>4} days  {}",
            item.id,
            item.name,
            item.category,
            item.quantity,
            item.expiry_date,
            item.remaining_days,
            item.status
        );
    }
    println!(
        "{} items, {} expired, {} expiring soon",
        report.total_items, report.expired_count, report.warning_count
    );
    Ok(())
}

fn show_recipe(conn: &mut database::Connection, id: RecipeId) -> Result<()> {
    let detail = recipe::get(conn, id)?;
    println!("{} ({})", detail.recipe.title, detail.recipe.created_at);
    for requirement in &detail.requirements {
        println!("  {}: {}", requirement.category, requirement.quantity);
    }
    if !detail.recipe.instructions.is_empty() {
        println!();
        println!("{}", detail.recipe.instructions);
    }
    Ok(())
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let args = Args::parse();
    let config = args.config()?;
    let mut conn = database::establish_connection_with_retry(
        &config.database_path,
        config.connect_attempts,
        config.connect_delay,
    )?;
    category::ensure_seeded(&mut conn)?;

    match args.commands {
        Commands::Categories => {
            for c in category::list_all(&mut conn)? {
                println!("{:>4}  {}  {}", c.id, c.color, c.name);
            }
        }
        Commands::List { search, category } => {
            list(&mut conn, &config, search.as_deref(), category)?
        }
        Commands::Add {
            name,
            category,
            quantity,
            expiry_date,
        } => {
            let id = ingredient::create(
                &mut conn,
                IngredientInput {
                    name: &name,
                    category_id: category,
                    quantity: &quantity,
                    expiry_date: &expiry_date,
                },
            )?;
            println!("added ingredient {id}");
        }
        Commands::Edit {
            id,
            name,
            category,
            quantity,
            expiry_date,
        } => ingredient::update(
            &mut conn,
            id,
            IngredientInput {
                name: &name,
                category_id: category,
                quantity: &quantity,
                expiry_date: &expiry_date,
            },
        )?,
        Commands::Delete { id } => ingredient::delete(&mut conn, id)?,
        Commands::Recipes => {
            for summary in recipe::list_all(&mut conn)? {
                println!(
                    "{:>4}  {}  [{}]",
                    summary.recipe.id,
                    summary.recipe.title,
                    summary.ingredients_list.join(", ")
                );
            }
        }
        Commands::AddRecipe {
            title,
            instructions,
            categories,
            quantities,
        } => {
            let id = recipe::create(&mut conn, &title, &instructions, &categories, &quantities)?;
            println!("added recipe {id}");
        }
        Commands::ShowRecipe { id } => show_recipe(&mut conn, id)?,
        Commands::DeleteRecipe { id } => recipe::delete(&mut conn, id)?,
    }
    Ok(())
}
