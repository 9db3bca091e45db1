use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "corner-transfer", version)]
#[command(about = "Cornèr Bank data transfer client.")]
pub struct Cli {
    /// The username
    #[arg(short, long, env = "CORNER_USERNAME", global = true)]
    pub username: Option<String>,

    /// The password (falls back to the OS keychain, then a prompt)
    #[arg(short, long, env = "CORNER_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// The base URL
    #[arg(long, env = "CORNER_URL", global = true)]
    pub url: Option<String>,

    /// The remote directory
    #[arg(short, long, global = true)]
    pub directory: Option<String>,

    /// Request timeout in seconds, 0 for none
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// GnuPG home directory holding the decryption key
    #[arg(long, global = true)]
    pub gnupg_home: Option<PathBuf>,

    /// Store the password in the OS keychain and remember the username
    /// after a successful login
    #[arg(long, global = true)]
    pub save_password: bool,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all files
    List(ListArgs),

    /// List unread files
    #[command(name = "list-unread")]
    ListUnread(ListArgs),

    /// Get the latest / newest file
    Latest {
        /// Download the latest file to this path instead of printing its name
        #[arg(long, value_name = "DESTINATION")]
        download: Option<PathBuf>,

        /// Don't decrypt the file
        #[arg(short, long)]
        nodecrypt: bool,
    },

    /// Download (and decrypt) a file
    Download {
        /// The filename
        filename: String,

        /// The destination path
        destination: PathBuf,

        /// Don't decrypt the file
        #[arg(short, long)]
        nodecrypt: bool,
    },

    /// Remove the stored password for the username from the OS keychain
    #[command(name = "forget-password")]
    ForgetPassword,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show id, put date and last read date next to each filename
    #[arg(short, long, conflicts_with = "json")]
    pub long: bool,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
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
    fn test_download_arguments() {
        let cli = Cli::try_parse_from([
            "corner-transfer", "-u", "alice", "-p", "pw", "download", "a.csv.gpg", "/tmp/a.csv", "--nodecrypt",
        ])
        .unwrap();

        assert_eq!(cli.username.as_deref(), Some("alice"));
        match cli.command {
            Command::Download { filename, destination, nodecrypt } => {
                assert_eq!(filename, "a.csv.gpg");
                assert_eq!(destination, PathBuf::from("/tmp/a.csv"));
                assert!(nodecrypt);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_list_unread_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "corner-transfer", "list-unread", "--long", "--url", "https://ft.example/", "-d", "IN",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://ft.example/"));
        assert_eq!(cli.directory.as_deref(), Some("IN"));
        assert!(matches!(cli.command, Command::ListUnread(ListArgs { long: true, json: false })));
    }

    #[test]
    fn test_long_and_json_conflict() {
        assert!(Cli::try_parse_from(["corner-transfer", "list", "--long", "--json"]).is_err());
    }
}
