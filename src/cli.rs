use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "textgate")]
#[command(about = "Gated text articles over may_minihttp", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// YAML configuration file
        #[arg(short, long, env = "TEXTGATE_CONFIG")]
        config: Option<PathBuf>,

        /// Listen address, e.g. 127.0.0.1:8080
        #[arg(long)]
        addr: Option<String>,

        /// Directory holding the content and session files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Keep everything in memory
        #[arg(long, default_value_t = false)]
        memory: bool,

        /// Append a request dump to every page
        #[arg(long, default_value_t = false)]
        debug: bool,
    },
    /// Print the registered routes and exit
    Routes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "textgate",
            "serve",
            "--addr",
            "127.0.0.1:9000",
            "--memory",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                addr, memory, debug, ..
            } => {
                assert_eq!(addr.as_deref(), Some("127.0.0.1:9000"));
                assert!(memory);
                assert!(!debug);
            }
            Commands::Routes => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_routes() {
        let cli = Cli::try_parse_from(["textgate", "routes"]).unwrap();
        assert!(matches!(cli.command, Commands::Routes));
    }
}
