mod certificate;
mod cli;
mod directive;
mod error;
mod report;
mod store;
mod sync;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;

use cli::Cli;
use report::ConsoleReporter;
use store::keystore::PasswordKeystore;
use sync::Synchronizer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let password = SecretString::new(cli.storepass);

    // An invalid password aborts here, before any directive is read.
    let mut store = PasswordKeystore::open(cli.keystore, password)
        .context("Failed to open trust store")?;

    let stdin = std::io::stdin();
    let mut reporter = ConsoleReporter;
    let mut sync = Synchronizer::new(&mut store, &mut reporter);
    sync.process_changes(stdin.lock())
        .context("Failed to read directives from stdin")?;
    sync.finish().context("Failed to save trust store")?;

    Ok(())
}
