use std::path::{Path, PathBuf};

use clap::Parser;

use pdfv::app::App;
use pdfv::config::Config;
use pdfv::error::{AppError, AppResult};
use pdfv::logging::init_logging;
use pdfv::session::DocumentSession;

/// Terminal PDF viewer.
#[derive(Debug, Parser)]
#[command(name = "pdfv", version, about)]
struct Cli {
    /// PDF to open. Without one the open prompt is shown.
    path: Option<PathBuf>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the document details as JSON and exit.
    #[arg(long)]
    info: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_logging(&config.log)?;

    if cli.info {
        let Some(path) = cli.path.as_ref() else {
            return Err(AppError::invalid_argument("--info needs a PDF path"));
        };
        return print_details(path);
    }

    let mut app = App::new(config);
    app.run(cli.path).await
}

fn print_details(path: &Path) -> AppResult<()> {
    let session = DocumentSession::load(path, 1)?;
    let json = serde_json::to_string_pretty(&session.details())
        .map_err(|err| AppError::metadata(format!("failed to encode details: {err}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn path_is_optional() {
        let cli = Cli::try_parse_from(["pdfv"]).expect("no args should parse");
        assert!(cli.path.is_none());
        assert!(!cli.info);
    }

    #[test]
    fn parses_path_config_and_info() {
        let cli = Cli::try_parse_from(["pdfv", "doc.pdf", "--config", "pdfv.toml", "--info"])
            .expect("full args should parse");
        assert_eq!(cli.path, Some(PathBuf::from("doc.pdf")));
        assert_eq!(cli.config, Some(PathBuf::from("pdfv.toml")));
        assert!(cli.info);
    }

    #[test]
    fn rejects_a_second_path() {
        assert!(Cli::try_parse_from(["pdfv", "a.pdf", "b.pdf"]).is_err());
    }
}
