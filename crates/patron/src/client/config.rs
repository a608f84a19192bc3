use crate::client::{
    pacing::{INTERACTIVE_PACING, Pacing, STAGED_PACING},
    sink::OrderKind,
    telemetry::LogFormat,
};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use core::{fmt, str::FromStr};
use patron_core::{
    Error,
    types::{
        DEFAULT_SERVER_ADDR, DEFAULT_STAFF_MEAL, EASTERN_ORDER, MealId, WESTERN_ORDER,
        dim_sum_batches,
    },
};
use tonic::{codec::CompressionEncoding, transport::Endpoint};

/// Command line for the `patron` binary.
///
/// Every global option can also be set through the environment (or a `.env`
/// file). The subcommand picks the RPC call shape to demonstrate.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "patron",
    version,
    about = "Orders meals from the kitchen over every gRPC call shape"
)]
pub struct CliArgs {
    /// Address of the kitchen's Waiter service. `http://` is assumed when no
    /// scheme is given.
    ///
    /// Environment variable: `PATRON_SERVER_ADDR`
    #[arg(long, env = "PATRON_SERVER_ADDR", global = true, default_value_t = String::from(DEFAULT_SERVER_ADDR))]
    pub server_addr: String,

    /// Compression applied to outbound messages and accepted on responses.
    ///
    /// Environment variable: `PATRON_COMPRESSION`
    #[arg(long, env = "PATRON_COMPRESSION", global = true, value_enum, default_value_t = Compression::None)]
    pub compression: Compression,

    /// Delay between single orders of `western`, in milliseconds: a range
    /// (`500-1500`), a fixed delay (`250`) or `0` to disable.
    ///
    /// Environment variable: `PATRON_STAGED_PACING`
    #[arg(long, env = "PATRON_STAGED_PACING", global = true, default_value_t = STAGED_PACING)]
    pub staged_pacing: Pacing,

    /// Delay between cart requests of `dimsum`, same format as
    /// `--staged-pacing`.
    ///
    /// Environment variable: `PATRON_INTERACTIVE_PACING`
    #[arg(long, env = "PATRON_INTERACTIVE_PACING", global = true, default_value_t = INTERACTIVE_PACING)]
    pub interactive_pacing: Pacing,

    /// Console log format. `RUST_LOG` controls the level.
    ///
    /// Environment variable: `PATRON_LOG_FORMAT`
    #[arg(long, env = "PATRON_LOG_FORMAT", global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Unary: order a single meal.
    Staff {
        #[arg(default_value_t = DEFAULT_STAFF_MEAL)]
        meal_id: MealId,
    },
    /// Server streaming: request several meals at once, served one by one.
    Eastern {
        #[arg(default_values_t = EASTERN_ORDER)]
        meal_ids: Vec<MealId>,
    },
    /// Client streaming: order meals one by one, served all at once.
    Western {
        #[arg(default_values_t = WESTERN_ORDER)]
        meal_ids: Vec<MealId>,
    },
    /// Bidirectional streaming: request carts (comma separated ids) while
    /// carts are served.
    #[command(name = "dimsum", alias = "dim-sum")]
    DimSum {
        #[arg(default_values_t = dim_sum_batches().into_iter().map(MealBatch))]
        batches: Vec<MealBatch>,
    },
}

/// Comma separated meal ids forming one cart request, e.g. `1,10,12`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealBatch(pub Vec<MealId>);

impl fmt::Display for MealBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", ids.join(","))
    }
}

impl FromStr for MealBatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(Error::InvalidRequest {
                reason: "a cart needs at least one meal id".to_string(),
            });
        }
        s.split(',')
            .map(|raw| {
                raw.trim().parse::<MealId>().map_err(|e| Error::InvalidRequest {
                    reason: format!("invalid meal id `{raw}` in cart `{s}`: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(MealBatch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Compression {
    None,
    Deflate,
    Gzip,
    Zstd,
}

impl From<Compression> for Option<CompressionEncoding> {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => None,
            Compression::Deflate => Some(CompressionEncoding::Deflate),
            Compression::Gzip => Some(CompressionEncoding::Gzip),
            Compression::Zstd => Some(CompressionEncoding::Zstd),
        }
    }
}

/// One order, as selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Staff(MealId),
    Eastern(Vec<MealId>),
    Western(Vec<MealId>),
    DimSum(Vec<Vec<MealId>>),
}

impl Order {
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Staff(_) => OrderKind::Staff,
            Order::Eastern(_) => OrderKind::Eastern,
            Order::Western(_) => OrderKind::Western,
            Order::DimSum(_) => OrderKind::DimSum,
        }
    }
}

impl From<Command> for Order {
    fn from(command: Command) -> Self {
        match command {
            Command::Staff { meal_id } => Order::Staff(meal_id),
            Command::Eastern { meal_ids } => Order::Eastern(meal_ids),
            Command::Western { meal_ids } => Order::Western(meal_ids),
            Command::DimSum { batches } => {
                Order::DimSum(batches.into_iter().map(|batch| batch.0).collect())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatronConfig {
    pub server_addr: String,
    pub compression: Option<CompressionEncoding>,
    pub staged_pacing: Pacing,
    pub interactive_pacing: Pacing,
    pub log_format: LogFormat,
    pub order: Order,
}

impl TryFrom<CliArgs> for PatronConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let raw_addr = args.server_addr.trim();
        if raw_addr.is_empty() {
            bail!("PATRON_SERVER_ADDR must not be empty");
        }

        let server_addr = if raw_addr.contains("://") {
            raw_addr.to_string()
        } else {
            format!("http://{raw_addr}")
        };
        Endpoint::from_shared(server_addr.clone())
            .with_context(|| format!("invalid server address `{server_addr}`"))?;

        Ok(Self {
            server_addr,
            compression: args.compression.into(),
            staged_pacing: args.staged_pacing,
            interactive_pacing: args.interactive_pacing,
            log_format: args.log_format,
            order: args.command.into(),
        })
    }
}
