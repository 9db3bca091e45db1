//! Command dispatch for the `corner-transfer` binary.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use corner_transfer_core::utils::{format_last_read, format_timestamp};
use corner_transfer_core::{
    Config, CredentialStore, Credentials, DirectoryListing, GpgDecryptor, PortalClient, RemoteFile,
};

use crate::cli::{Cli, Command, ListArgs};

/// Where the password used for login came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordSource {
    Argument,
    Keychain,
    Prompt,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let username = resolve_username(&cli, &config)?;
    let base_url = cli.url.clone().unwrap_or_else(|| config.base_url().to_string());

    let command = match cli.command {
        Command::ForgetPassword => {
            if CredentialStore::delete(&username, &base_url)? {
                eprintln!("Removed stored password for {}", username);
            } else {
                eprintln!("No stored password for {}", username);
            }
            return Ok(());
        }
        ref command => command,
    };

    let (password, source) = resolve_password(&cli, &username, &base_url)?;
    let directory = cli.directory.clone().unwrap_or_else(|| config.directory().to_string());

    let timeout = match cli.timeout {
        Some(0) => None,
        Some(secs) => Some(std::time::Duration::from_secs(secs)),
        None => config.request_timeout(),
    };

    let mut decryptor = GpgDecryptor::new();
    if let Some(home) = cli.gnupg_home.clone().or_else(|| config.gnupg_home.clone()) {
        decryptor = decryptor.with_homedir(home);
    }

    let credentials = Credentials::new(username, password, base_url);
    let client = PortalClient::with_timeout(credentials.clone(), timeout)?
        .with_decryptor(Box::new(decryptor));

    client
        .login()
        .await
        .with_context(|| format!("Login to {} failed", client.session().base_url()))?;

    remember_login(&mut config, &cli, &credentials, source);

    match command {
        Command::List(args) => {
            let listing = client.list_files(&directory).await?;
            print_listing(&listing, args)?;
        }
        Command::ListUnread(args) => {
            let listing = client.list_unread_files(&directory).await?;
            print_listing(&listing, args)?;
        }
        Command::Latest { download, nodecrypt } => {
            let latest = client.latest_file(&directory).await?;
            match download {
                Some(destination) => {
                    client.download(&latest, destination, !*nodecrypt).await?;
                    report_download(&latest.filename, destination);
                }
                None => println!("{}", latest),
            }
        }
        Command::Download { filename, destination, nodecrypt } => {
            let listing = client.list_files(&directory).await?;
            let file = listing.require(filename)?;
            client.download(file, destination, !*nodecrypt).await?;
            report_download(&file.filename, destination);
        }
        Command::ForgetPassword => {}
    }

    Ok(())
}

fn resolve_username(cli: &Cli, config: &Config) -> Result<String> {
    cli.username
        .clone()
        .or_else(|| config.last_username.clone())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| anyhow::anyhow!("No username given; pass --username or set CORNER_USERNAME"))
}

fn resolve_password(cli: &Cli, username: &str, base_url: &str) -> Result<(String, PasswordSource)> {
    if let Some(ref password) = cli.password {
        return Ok((password.clone(), PasswordSource::Argument));
    }

    match CredentialStore::get_password(username, base_url) {
        Ok(Some(password)) => {
            debug!(username, "Using password from keychain");
            return Ok((password, PasswordSource::Keychain));
        }
        Ok(None) => debug!(username, "No keychain password"),
        Err(e) => warn!(error = %e, "Keychain unavailable"),
    }

    let password = rpassword::prompt_password(format!("Password for {}: ", username))
        .context("Failed to read password")?;
    Ok((password, PasswordSource::Prompt))
}

/// Persist the password and username after a good login, only with `--save-password`
fn remember_login(config: &mut Config, cli: &Cli, credentials: &Credentials, source: PasswordSource) {
    if !cli.save_password {
        return;
    }

    if source != PasswordSource::Keychain {
        match CredentialStore::store(credentials) {
            Ok(()) => info!(username = credentials.username(), "Password stored in keychain"),
            Err(e) => warn!(error = %e, "Failed to store credentials"),
        }
    }

    if record_username(config, cli, credentials.username()) {
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
}

/// Set `last_username`, returning whether the config needs saving
fn record_username(config: &mut Config, cli: &Cli, username: &str) -> bool {
    if !cli.save_password || config.last_username.as_deref() == Some(username) {
        return false;
    }
    config.last_username = Some(username.to_string());
    true
}

fn print_listing(listing: &DirectoryListing, args: &ListArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let files: Vec<_> = listing.iter().collect();
        serde_json::to_writer_pretty(&mut out, &files)?;
        writeln!(out)?;
    } else if args.long {
        let width = listing.filenames().map(str::len).max().unwrap_or(0);
        for file in listing {
            writeln!(
                out,
                "{:<width$}  {}  {}  {}",
                file.filename,
                put_date_column(file),
                last_read_column(file),
                file.id,
                width = width
            )?;
        }
    } else {
        for file in listing {
            writeln!(out, "{}", file.filename)?;
        }
    }

    Ok(())
}

/// Unreadable dates are shown as sent
fn put_date_column(file: &RemoteFile) -> String {
    match file.put_date() {
        Ok(ts) => format_timestamp(&ts),
        Err(_) => file.raw_put_date.clone().unwrap_or_else(|| "-".to_string()),
    }
}

fn last_read_column(file: &RemoteFile) -> String {
    match file.last_read_date() {
        Ok(ts) => format_last_read(ts.as_ref()),
        Err(_) => file.raw_last_read_date.clone().unwrap_or_default(),
    }
}

fn report_download(filename: &str, destination: &Path) {
    eprintln!("Downloaded {} to {}", filename, destination.display());
}
