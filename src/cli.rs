use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Config file (default: <config dir>/bookbridge/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database, overrides `db_path` from the config.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Listen address, overrides `listen_addr` from the config.
    #[arg(long, global = true)]
    pub addr: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the public site and the JSON API.
    Serve,
    /// Terminal admin console.
    Admin {
        /// Admin route to open on, e.g. `/admin/adsense`.
        route: Option<String>,
    },
    /// Bulk import chapter content from an .xlsx/.xls file.
    Import { file: PathBuf },
    /// Print one chapter as markdown.
    Export {
        #[arg(long)]
        book: String,
        #[arg(long)]
        chapter: String,
    },
}

impl Command {
    /// The admin console owns the terminal, so it only logs warnings.
    pub fn default_log_level(&self) -> tracing::Level {
        match self {
            Command::Admin { .. } => tracing::Level::WARN,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_route_is_optional() {
        let cli = Cli::parse_from(["bookbridge", "admin", "/admin/adsense"]);
        assert!(matches!(cli.command, Command::Admin { route: Some(ref r) } if r == "/admin/adsense"));

        let cli = Cli::parse_from(["bookbridge", "admin"]);
        assert!(matches!(cli.command, Command::Admin { route: None }));
    }

    #[test]
    fn overrides_parse_after_subcommand() {
        let cli = Cli::parse_from(["bookbridge", "serve", "--addr", "0.0.0.0:8080", "--db", "x.db"]);
        assert_eq!(cli.addr.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        assert_eq!(cli.command.default_log_level(), tracing::Level::INFO);
    }

    #[test]
    fn export_needs_book_and_chapter() {
        assert!(Cli::try_parse_from(["bookbridge", "export", "--book", "dune"]).is_err());
        let cli =
            Cli::try_parse_from(["bookbridge", "export", "--book", "dune", "--chapter", "chapter-1"])
                .unwrap();
        assert!(matches!(cli.command, Command::Export { .. }));
    }
}
