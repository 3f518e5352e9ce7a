use clap::{Parser, Subcommand};

const HELP_EPILOG: &str = r#"Server options can also be provided via environment variables:
  CONFIG_PATH (default: ./config.yaml)
  DB_PATH     (default: data/app.db)
  PORT        (default: 3000 or config.listen_port)

Admins listed in the config are upserted on every start; `create-admin`
adds one directly to the database.
"#;

#[derive(Debug, Parser)]
#[command(
    name = "giftdrive-server",
    version,
    about = "Gift drive pledge server",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Optional subcommand. Without one, runs the server.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update an admin account (password is bcrypt-hashed)
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Print a bcrypt hash suitable for `admins[].password_hash` in the config
    HashPassword { password: String },
    /// Insert sample parties and children into an empty database
    SeedDemo,
}
