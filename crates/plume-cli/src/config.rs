use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use core::time::Duration;
use plume::{GeneratorConfig, KindTag, ProcessId, WorkerId};

/// Operator tooling for plume identifiers and auth tokens.
///
/// Generator settings are read from flags, environment variables or a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "plume-cli", version, about)]
pub struct CliArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GeneratorArgs {
    /// Worker slot encoded into every minted ID (0-31).
    ///
    /// The (worker, process) pair must be unique across every generator that
    /// mints into the same ID space.
    ///
    /// Environment variable: `PLUME_WORKER_ID`
    #[arg(long, global = true, env = "PLUME_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Process slot encoded into every minted ID (0-31).
    ///
    /// Environment variable: `PLUME_PROCESS_ID`
    #[arg(long, global = true, env = "PLUME_PROCESS_ID", default_value_t = 0)]
    pub process_id: u64,

    /// How far (ms) the clock may step backwards before minting fails
    /// instead of waiting for it to catch up.
    ///
    /// Environment variable: `PLUME_MAX_CLOCK_SKEW_MS`
    #[arg(long, global = true, env = "PLUME_MAX_CLOCK_SKEW_MS", default_value_t = 5)]
    pub max_clock_skew_ms: u64,

    /// Upper bound (ms) on the time a single mint waits for the clock.
    ///
    /// Environment variable: `PLUME_WAIT_TIMEOUT_MS`
    #[arg(long, global = true, env = "PLUME_WAIT_TIMEOUT_MS", default_value_t = 1000)]
    pub wait_timeout_ms: u64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mint new identifiers, printed one per line as `<kind>:<decimal>`.
    Mint {
        /// Entity kind: `user`, `post` or `auth-token`.
        #[arg(long)]
        kind: KindTag,

        /// Number of identifiers to mint.
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Print the fields of an identifier (`<kind>:<decimal>` or a bare
    /// decimal) as JSON.
    Decode { id: String },

    /// Issue or check auth tokens.
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum TokenCommand {
    /// Issue a token for a user and print the record as JSON.
    Issue {
        /// Owner, as `user:<decimal>` or a bare decimal.
        #[arg(long)]
        user: String,

        /// Lifetime in seconds. Without it the token never expires.
        #[arg(long)]
        ttl_seconds: Option<u64>,
    },

    /// Print whether a token with the given window is `valid` or `expired`.
    Check {
        /// Creation time, RFC 3339.
        #[arg(long)]
        created_at: DateTime<Utc>,

        #[arg(long)]
        ttl_seconds: Option<u64>,

        /// Time to check at, RFC 3339. Defaults to now.
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

impl TryFrom<GeneratorArgs> for GeneratorConfig {
    type Error = anyhow::Error;

    fn try_from(args: GeneratorArgs) -> Result<Self, Self::Error> {
        let worker_id = WorkerId::try_from(args.worker_id)
            .map_err(|e| anyhow!("PLUME_WORKER_ID: {e}"))?;
        let process_id = ProcessId::try_from(args.process_id)
            .map_err(|e| anyhow!("PLUME_PROCESS_ID: {e}"))?;

        if args.wait_timeout_ms == 0 {
            bail!("PLUME_WAIT_TIMEOUT_MS must be greater than 0");
        }

        Ok(GeneratorConfig::new(worker_id, process_id)
            .with_max_clock_skew(Duration::from_millis(args.max_clock_skew_ms))
            .with_wait_timeout(Duration::from_millis(args.wait_timeout_ms)))
    }
}
