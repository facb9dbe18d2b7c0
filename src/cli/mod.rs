use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::ffi::OsString;

/// `ope` - open files and folders from the browser.
///
/// Any first argument that is not one of the commands below is treated as an
/// `ope://` URL to open.
#[derive(Parser, Debug)]
#[command(name = "ope")]
#[command(version)]
#[command(about = "Open files and folders from ope:// links.", long_about = None)]
#[command(allow_external_subcommands = true)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Log resolution steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Register the ope:// URL scheme for the current user
    Install,

    /// Unregister the ope:// URL scheme
    Uninstall,

    /// Show the policy file location and its blocked/allowed lists
    Config,

    /// Print version
    Version,

    /// Open the path an ope:// URL points to
    #[command(external_subcommand)]
    Open(Vec<String>),
}

impl Cli {
    /// Parse `args` (program name first).
    ///
    /// A leading flag clap does not know, such as `-x` or `--foo`, is taken as
    /// the URL like any other unknown first token. `--verbose` before it is
    /// still honoured.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match Self::try_parse_from(&args) {
            Ok(cli) => Ok(cli),
            Err(error) if error.kind() == ErrorKind::UnknownArgument => {
                Self::unknown_flag_as_url(&args).ok_or(error)
            }
            Err(error) => Err(error),
        }
    }

    fn unknown_flag_as_url(args: &[OsString]) -> Option<Self> {
        let tokens: Vec<String> = args
            .iter()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let start = tokens
            .iter()
            .position(|token| !matches!(token.as_str(), "-v" | "--verbose"))?;
        if !tokens[start].starts_with('-') {
            return None;
        }
        Some(Self {
            verbose: start > 0,
            command: Some(Commands::Open(tokens[start..].to_vec())),
        })
    }
}
