use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use simple_imdb::config::AppConfig;
use simple_imdb::{Backend, ImdbApi, Record};

#[derive(Parser, Debug)]
#[command(name = "simple-imdb")]
#[command(version, about = "Look up IMDb titles and people as flat JSON records")]
struct Cli {
    /// Backend to query (overrides configuration)
    #[arg(short, long)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a title, e.g. `tt0477051` or `477051`
    Movie {
        id: String,
        /// akas, credits or release_dates (REST only)
        subselection: Option<String>,
    },
    /// Fetch a person, e.g. `nm0000115` or `115`
    Person {
        id: String,
        /// known_for (REST only)
        subselection: Option<String>,
    },
    /// Fetch a title and merge one sub-selection into it
    UpdateMovie { id: String, subselection: String },
    /// Fetch a person and merge one sub-selection into it
    UpdatePerson { id: String, subselection: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.client.backend = backend;
    }
    log::info!("Using the {} backend", config.client.backend);
    let api = ImdbApi::from_config(&config)?;

    let record = run(&api, cli.command).await?;
    print_record(record)
}

async fn run(api: &ImdbApi, command: Command) -> anyhow::Result<Record> {
    let record = match command {
        Command::Movie { id, subselection } => api
            .get_movie(id.as_str(), subselection.as_deref())
            .await
            .with_context(|| format!("fetching title {}", id))?,
        Command::Person { id, subselection } => api
            .get_person(id.as_str(), subselection.as_deref())
            .await
            .with_context(|| format!("fetching person {}", id))?,
        Command::UpdateMovie { id, subselection } => {
            let mut movie = api
                .get_movie(id.as_str(), None)
                .await
                .with_context(|| format!("fetching title {}", id))?;
            api.update_movie(&mut movie, &subselection)
                .await
                .with_context(|| format!("updating {} of title {}", subselection, id))?;
            movie
        }
        Command::UpdatePerson { id, subselection } => {
            let mut person = api
                .get_person(id.as_str(), None)
                .await
                .with_context(|| format!("fetching person {}", id))?;
            api.update_person(&mut person, &subselection)
                .await
                .with_context(|| format!("updating {} of person {}", subselection, id))?;
            person
        }
    };
    Ok(record)
}

fn print_record(record: Record) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&Value::Object(record))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookups() {
        let cli = Cli::try_parse_from(["simple-imdb", "movie", "477051", "akas"]).unwrap();
        match cli.command {
            Command::Movie { id, subselection } => {
                assert_eq!(id, "477051");
                assert_eq!(subselection.as_deref(), Some("akas"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli =
            Cli::try_parse_from(["simple-imdb", "--backend", "GraphQL", "person", "nm0000115"])
                .unwrap();
        assert_eq!(cli.backend, Some(Backend::GraphQl));
        assert!(matches!(cli.command, Command::Person { subselection: None, .. }));
    }

    #[test]
    fn test_update_requires_subselection() {
        assert!(Cli::try_parse_from(["simple-imdb", "update-movie", "tt0477051"]).is_err());
        let cli = Cli::try_parse_from(["simple-imdb", "update-person", "115", "known_for"]).unwrap();
        assert!(matches!(cli.command, Command::UpdatePerson { .. }));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["simple-imdb", "--backend", "soap", "movie", "1"]).is_err());
    }
}
