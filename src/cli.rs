use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "trustsync",
    about = "Synchronize a password-protected X.509 trust store from add/remove directives on stdin.",
    version
)]
pub struct Cli {
    /// Path to the trust store file. Created on first save if absent.
    #[arg(long, env = "TRUSTSYNC_KEYSTORE")]
    pub keystore: PathBuf,

    /// Password protecting the trust store.
    #[arg(
        long,
        env = "TRUSTSYNC_STOREPASS",
        default_value = "changeit",
        hide_env_values = true
    )]
    pub storepass: String,
}
