use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the plugin search API (default)
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:3000
        #[arg(required = false, short, long)]
        listen: Option<String>,

        /// URL of the plugin database
        #[arg(required = false, long, value_hint = ValueHint::Url)]
        feed_url: Option<String>,
    },

    /// Print the default configuration to stdout
    #[clap(name = "defconfig")]
    DefConfig,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Serve {
            listen: None,
            feed_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let args = Args::parse_from(["nvimsh"]);
        assert_eq!(args.command.unwrap_or_default(), Commands::default());
    }

    #[test]
    fn test_serve_overrides() {
        let args = Args::parse_from([
            "nvimsh",
            "-vv",
            "serve",
            "--listen",
            "127.0.0.1:3000",
            "--feed-url",
            "http://localhost/db.json",
        ]);

        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Some(Commands::Serve {
                listen: Some("127.0.0.1:3000".into()),
                feed_url: Some("http://localhost/db.json".into()),
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["nvimsh", "defconfig", "--no-color", "-c", "/tmp/nvimsh.toml"]);
        assert!(args.no_color);
        assert_eq!(args.config.as_deref(), Some("/tmp/nvimsh.toml"));
        assert_eq!(args.command, Some(Commands::DefConfig));
    }
}
