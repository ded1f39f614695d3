use clap::{Parser as ClapParser, Subcommand};
use lingua_query::cli::{self, CliError, TranslateOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "lingua")]
#[command(about = "Lingua - translates schema-aware natural-language queries into SQL or MongoDB expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a query against one or more sample data files
    Translate {
        /// The query to translate (reads from stdin if not provided)
        query: Option<String>,

        /// Sample data file (.csv or .json); repeatable
        #[arg(short, long = "sample", required = true)]
        samples: Vec<String>,

        /// Target dialect: sql or mongo (defaults to the samples' dialect)
        #[arg(short, long)]
        dialect: Option<String>,
    },

    /// Print the schema inferred from sample data files
    Schema {
        /// Sample data file (.csv or .json); repeatable
        #[arg(short, long = "sample", required = true)]
        samples: Vec<String>,
    },
}

fn main() {
    env_logger::builder().format_timestamp(None).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate {
            query,
            samples,
            dialect,
        } => run_translate(query, samples, dialect),
        Commands::Schema { samples } => match cli::render_schema(&samples) {
            Ok(text) => {
                print!("{}", text);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_translate(
    query: Option<String>,
    samples: Vec<String>,
    dialect: Option<String>,
) -> Result<(), CliError> {
    let query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            buffer.trim().to_string()
        }
        None => return Err(CliError::NoQuery),
    };

    let options = TranslateOptions {
        query,
        samples,
        dialect,
    };

    println!("{}", cli::execute_translate(&options)?);
    Ok(())
}
