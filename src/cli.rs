//! Command-line interface.
//!
//! Connection options come before the sub-command, check options after it:
//! `check_artemis --host mq -u admin -p secret queuesize -w 10 -c 100 'ORDER_*'`

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::check::{CheckKind, QueuePattern, Thresholds};
use crate::config::loader::{finalize, load_config};
use crate::config::{ConfigError, ProbeConfig, ThresholdConfig};

#[derive(Debug, Parser)]
#[command(name = "check_artemis")]
#[command(version, about = "Monitoring plugin for ActiveMQ Artemis via its Jolokia management API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// TOML configuration file; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Connection")]
pub struct ConnectionArgs {
    /// The console is TLS secured
    #[arg(long)]
    pub ssl: bool,

    /// Broker hostname [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Console port [default: 8161]
    #[arg(long)]
    pub port: Option<u16>,

    /// Request timeout in seconds [default: 5]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Name of the broker [default: localhost]
    #[arg(short = 'b', long = "broker-name", alias = "brokerName")]
    pub broker_name: Option<String>,

    /// Jolokia URL tail [default: console/jolokia]
    #[arg(long = "url-tail")]
    pub url_tail: Option<String>,

    /// Complete Jolokia URL; --host, --port, --url-tail, --user and --pwd are
    /// ignored when set
    #[arg(short = 'j', long = "jolokia-url")]
    pub jolokia_url: Option<String>,

    /// Admin account user [default: admin]
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Admin account password [default: admin]
    #[arg(short = 'p', long = "pwd")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct ThresholdArgs {
    /// Warning if the value is greater than or equal to WARN [default: 10]
    #[arg(short, long, value_name = "WARN", allow_negative_numbers = true)]
    pub warn: Option<i64>,

    /// Critical if the value is greater than or equal to CRIT [default: 100]
    #[arg(short, long, value_name = "CRIT", allow_negative_numbers = true)]
    pub crit: Option<i64>,
}

impl ThresholdArgs {
    fn resolve(&self, defaults: ThresholdConfig) -> Thresholds {
        Thresholds::new(
            self.warn.unwrap_or(defaults.warn),
            self.crit.unwrap_or(defaults.crit),
        )
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Age in minutes of the oldest message of one or more queues
    #[command(name = "queueage")]
    QueueAge {
        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Queue name or shell-style wildcard (`*`, `?`); all queues if omitted
        queue: Option<String>,
    },

    /// Message count of one or more queues
    #[command(name = "queuesize")]
    QueueSize {
        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Queue name or shell-style wildcard (`*`, `?`); all queues if omitted
        queue: Option<String>,
    },

    /// Whether the broker reports itself as started
    Health,

    /// Whether a queue or topic with the given name exists
    Exists {
        /// Exact name of the queue or topic
        #[arg(long)]
        name: String,
    },

    /// New messages in dead-letter queues since the previous run
    Dlq {
        /// Name prefix of the dead-letter queues [default: DLQ]
        #[arg(long)]
        prefix: Option<String>,

        /// Base directory of the delta cache [default: ~/.cache]
        #[arg(long)]
        cachedir: Option<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

impl Cli {
    /// Load the config file (if any), apply overrides and validate.
    pub fn resolve_config(&self) -> Result<ProbeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ProbeConfig::default(),
        };
        self.apply(&mut config);
        finalize(config)
    }

    /// Overlay command-line values onto `config`.
    pub fn apply(&self, config: &mut ProbeConfig) {
        let args = &self.connection;
        let conn = &mut config.connection;

        conn.ssl |= args.ssl;
        if let Some(host) = &args.host {
            conn.host = host.clone();
        }
        if let Some(port) = args.port {
            conn.port = port;
        }
        if let Some(timeout) = args.timeout {
            conn.timeout_secs = timeout;
        }
        if let Some(broker) = &args.broker_name {
            conn.broker_name = broker.clone();
        }
        if let Some(tail) = &args.url_tail {
            conn.url_tail = tail.clone();
        }
        if let Some(url) = &args.jolokia_url {
            conn.jolokia_url = Some(url.clone());
        }
        if let Some(user) = &args.user {
            conn.user = user.clone();
        }
        if let Some(password) = &args.password {
            conn.password = password.clone();
        }

        if let Command::Dlq {
            prefix, cachedir, ..
        } = &self.command
        {
            if let Some(prefix) = prefix {
                config.dlq.prefix = prefix.clone();
            }
            if let Some(dir) = cachedir {
                config.dlq.cache_dir = dir.clone();
            }
        }
    }

    /// The check selected by the sub-command.
    pub fn check_kind(&self, config: &ProbeConfig) -> CheckKind {
        match &self.command {
            Command::QueueAge { thresholds, queue } => CheckKind::QueueAge {
                pattern: QueuePattern::new(queue.clone()),
                thresholds: thresholds.resolve(config.thresholds),
            },
            Command::QueueSize { thresholds, queue } => CheckKind::QueueSize {
                pattern: QueuePattern::new(queue.clone()),
                thresholds: thresholds.resolve(config.thresholds),
            },
            Command::Health => CheckKind::Health,
            Command::Exists { name } => CheckKind::Exists { name: name.clone() },
            Command::Dlq { thresholds, .. } => CheckKind::Dlq {
                prefix: config.dlq.prefix.clone(),
                cache_dir: config.dlq.cache_dir.clone(),
                thresholds: thresholds.resolve(config.thresholds),
            },
        }
    }
}
