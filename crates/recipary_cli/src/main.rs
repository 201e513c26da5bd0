//! Command-line surface over the recipary core.
//!
//! # Responsibility
//! - Map list/show/add/edit/delete/scale/tags commands onto the
//!   `RecipeService` use-case APIs.
//! - Keep output line-oriented and deterministic.

use clap::{Parser, Subcommand};
use recipary_core::db::open_db;
use recipary_core::{
    IngredientRow, Recipe, RecipeDraft, RecipeListQuery, RecipeService, SqliteRecipeRepository,
    Unit,
};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "recipary", version, about = "Manage a local recipe store")]
struct Cli {
    /// Path to the SQLite recipe store.
    #[arg(long, default_value = "recipary.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List recipes, optionally filtered by search text and tag.
    List {
        /// Case-insensitive match against title and description.
        #[arg(long)]
        search: Option<String>,
        /// Exact tag membership filter.
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one recipe in full.
    Show {
        id: Uuid,
        /// Display ingredient quantities scaled to this serving count.
        #[arg(long)]
        servings: Option<u32>,
        /// Print the raw record as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Create a recipe.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instructions: String,
        /// Repeatable: one ingredient as "QTY UNIT NAME", e.g. "2 cup flour".
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long, default_value_t = 1)]
        base_servings: u32,
        /// Repeatable tag.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 0)]
        prep: u32,
        #[arg(long, default_value_t = 0)]
        cook: u32,
    },
    /// Replace fields of an existing recipe; omitted fields are kept.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        /// Repeatable; when given, replaces the whole ingredient list.
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long)]
        base_servings: Option<u32>,
        /// Repeatable; when given, replaces the whole tag list.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        prep: Option<u32>,
        #[arg(long)]
        cook: Option<u32>,
    },
    /// Delete a recipe permanently.
    Delete { id: Uuid },
    /// Print ingredients scaled to a serving count without saving anything.
    Scale {
        id: Uuid,
        #[arg(long)]
        servings: u32,
    },
    /// List all known tags.
    Tags,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        recipary_core::init_logging(recipary_core::default_log_level(), log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let service = RecipeService::new(SqliteRecipeRepository::new(&conn));

    match cli.command {
        Command::List {
            search,
            tag,
            limit,
            offset,
        } => {
            let query = RecipeListQuery {
                search,
                tag,
                limit,
                offset,
            };
            let recipes = service.list_recipes(&query)?;
            if recipes.is_empty() {
                println!("no recipes match");
                return Ok(());
            }
            for recipe in &recipes {
                print_summary(recipe);
            }
        }
        Command::Show { id, servings, json } => {
            let recipe = service
                .get_recipe(id)?
                .ok_or_else(|| format!("recipe not found: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
                return Ok(());
            }
            print_detail(&recipe);
            if let Some(target) = servings {
                let scaled = service.scale_recipe(id, target)?;
                println!("\nscaled to {target} servings:");
                print_rows(&scaled);
            }
        }
        Command::Add {
            title,
            description,
            instructions,
            ingredients,
            base_servings,
            tags,
            prep,
            cook,
        } => {
            let draft = RecipeDraft {
                title,
                description,
                ingredients: parse_ingredients(&ingredients)?,
                base_servings,
                instructions,
                tags,
                prep_time_minutes: prep,
                cook_time_minutes: cook,
            };
            let recipe = service.create_recipe(&draft)?;
            println!("created {}", recipe.uuid);
        }
        Command::Edit {
            id,
            title,
            description,
            instructions,
            ingredients,
            base_servings,
            tags,
            prep,
            cook,
        } => {
            let current = service
                .get_recipe(id)?
                .ok_or_else(|| format!("recipe not found: {id}"))?;
            let draft = RecipeDraft {
                title: title.unwrap_or(current.title),
                description: description.or(current.description),
                ingredients: if ingredients.is_empty() {
                    current.ingredients
                } else {
                    parse_ingredients(&ingredients)?
                },
                base_servings: base_servings.unwrap_or(current.base_servings),
                instructions: instructions.unwrap_or(current.instructions),
                tags: if tags.is_empty() { current.tags } else { tags },
                prep_time_minutes: prep.unwrap_or(current.prep_time_minutes),
                cook_time_minutes: cook.unwrap_or(current.cook_time_minutes),
            };
            service.update_recipe(id, &draft)?;
            println!("updated {id}");
        }
        Command::Delete { id } => {
            service.delete_recipe(id)?;
            println!("deleted {id}");
        }
        Command::Scale { id, servings } => {
            let scaled = service.scale_recipe(id, servings)?;
            print_rows(&scaled);
        }
        Command::Tags => {
            for tag in service.list_tags()? {
                println!("{tag}");
            }
        }
    }

    Ok(())
}

fn print_summary(recipe: &Recipe) {
    let tags = if recipe.tags.is_empty() {
        "none".to_string()
    } else {
        recipe.tags.join(", ")
    };
    println!("{}  {}  [{tags}]", recipe.uuid, recipe.title);
    if let Some(description) = &recipe.description {
        println!("    {description}");
    }
}

fn print_detail(recipe: &Recipe) {
    println!("{}", recipe.title);
    if let Some(description) = &recipe.description {
        println!("{description}");
    }
    println!(
        "prep: {} min  cook: {} min  servings: {}",
        recipe.prep_time_minutes, recipe.cook_time_minutes, recipe.base_servings
    );
    let tags = if recipe.tags.is_empty() {
        "none".to_string()
    } else {
        recipe.tags.join(", ")
    };
    println!("tags: {tags}");
    println!("\ningredients:");
    print_rows(&recipe.ingredients);
    println!("\ninstructions:\n{}", recipe.instructions);
}

fn print_rows(rows: &[IngredientRow]) {
    for row in rows {
        println!("  {}", row.flattened());
    }
}

/// Parses "QTY UNIT NAME" ingredient arguments into fresh rows.
fn parse_ingredients(lines: &[String]) -> Result<Vec<IngredientRow>, Box<dyn Error>> {
    lines.iter().map(|line| parse_ingredient(line)).collect()
}

fn parse_ingredient(line: &str) -> Result<IngredientRow, Box<dyn Error>> {
    let mut parts = line.trim().splitn(3, ' ');
    let (quantity_text, unit_text, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(quantity), Some(unit), Some(name)) => (quantity, unit, name.trim()),
        _ => return Err(format!("expected \"QTY UNIT NAME\", got `{line}`").into()),
    };

    let quantity: f64 = quantity_text
        .parse()
        .map_err(|_| format!("invalid quantity `{quantity_text}` in `{line}`"))?;
    if quantity < 0.0 {
        return Err(format!("quantity must not be negative in `{line}`").into());
    }
    let unit = Unit::parse(unit_text).ok_or_else(|| {
        format!(
            "unknown unit `{unit_text}` in `{line}`; expected one of {}",
            Unit::ALL.map(|unit| unit.as_str()).join("|")
        )
    })?;

    let mut row = IngredientRow::new();
    row.name = name.to_string();
    row.quantity = quantity;
    row.unit = unit;
    Ok(row)
}
