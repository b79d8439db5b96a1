use clap::{Parser, Subcommand};

/// Fake CareCloud: mock practice-management API for integration testing
#[derive(Parser)]
#[command(name = "carecloud-mock", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind (overrides FAKE_CARECLOUD_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides FAKE_CARECLOUD_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch an access token from a running server
    Token {
        /// Base URL of the server
        #[arg(long, env = "FAKE_CARECLOUD_URL", default_value = "http://localhost:7000")]
        url: String,
        /// OAuth grant type
        #[arg(long, default_value = "refresh_token")]
        grant_type: String,
        /// Refresh token to send (not verified by the server)
        #[arg(long, default_value = "dummy")]
        refresh_token: String,
        /// Print as a shell export statement
        #[arg(long)]
        export: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Print only the token
        #[arg(short, long)]
        quiet: bool,
    },

    /// Create the schema and load seed data if the database is empty
    Seed,

    /// Delete all data, then reload seed data
    Reset,
}
