use clap::{Args, Parser, Subcommand};
use recipe_normalize::{
    Difficulty, NormalizedRecipe, RecipeError, RecipeImporter, RecipePreferences,
};
use std::process::ExitCode;
use tokio::io::AsyncReadExt;

#[derive(Parser, Debug)]
#[command(name = "recipe-normalize")]
#[command(about = "Normalize a recipe from a web page, text, photo or preferences into JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the recipe published on a web page
    Url {
        /// Page address
        url: String,
    },
    /// Structure recipe text from a file
    Text {
        /// Text file, or "-" to read stdin
        path: String,
    },
    /// Recognize and structure a photographed recipe
    Image {
        /// Image file
        path: String,
    },
    /// Generate a new recipe from preferences
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Free-text idea, e.g. "a spicy pasta dish"
    idea: Option<String>,

    /// Comma separated ingredients already at hand
    #[arg(long)]
    ingredients: Option<String>,

    #[arg(long)]
    cuisine: Option<String>,

    /// Easy, Medium or Advanced
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    meal_type: Option<String>,

    #[arg(long, default_value_t = 4)]
    servings: u32,

    /// Upper bound on total cooking time in minutes
    #[arg(long, default_value_t = 30)]
    max_time: u32,
}

impl From<GenerateArgs> for RecipePreferences {
    fn from(args: GenerateArgs) -> Self {
        RecipePreferences {
            idea: args.idea.unwrap_or_default(),
            available_ingredients: args.ingredients.unwrap_or_default(),
            cuisine: args.cuisine,
            difficulty: args.difficulty,
            meal_type: args.meal_type,
            servings: args.servings,
            max_cooking_minutes: args.max_time,
        }
    }
}

fn parse_difficulty(label: &str) -> Result<Difficulty, String> {
    Difficulty::from_label(label).ok_or_else(|| format!("unknown difficulty: {label}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let recipe = match run(cli.command).await {
        Ok(recipe) => recipe,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&recipe) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<NormalizedRecipe, RecipeError> {
    let builder = RecipeImporter::builder();
    let builder = match command {
        Command::Url { url } => builder.url(url),
        Command::Text { path } => builder.text(read_text(&path).await?),
        Command::Image { path } => builder.image(path),
        Command::Generate(args) => builder.preferences(args.into()),
    };
    builder.build().await
}

/// Read recipe text from a file, or from stdin when the path is `-`.
async fn read_text(path: &str) -> Result<String, RecipeError> {
    let result = if path == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map(|_| text)
    } else {
        tokio::fs::read_to_string(path).await
    };
    result.map_err(|e| RecipeError::InvalidInput(format!("cannot read {}: {}", path, e)))
}
