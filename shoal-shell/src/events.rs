//! Tracing configuration for the shell.

use std::fmt::Display;

use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Type of event to trace.
#[derive(Clone, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces command resolution and execution.
    #[clap(name = "commands")]
    Commands,
    /// Traces the process of parsing tokens into an abstract syntax tree.
    #[clap(name = "parse")]
    Parse,
    /// Traces the process of tokenizing input text.
    #[clap(name = "tokenize")]
    Tokenize,
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commands => write!(f, "commands"),
            Self::Parse => write!(f, "parse"),
            Self::Tokenize => write!(f, "tokenize"),
        }
    }
}

/// Initializes tracing: events default to INFO, with DEBUG enabled for the
/// requested targets. Output goes to standard error so it never mixes with
/// command output.
pub(crate) fn init_tracing(enabled_trace_events: &[TraceEvent]) {
    let mut filter = tracing_subscriber::filter::Targets::new()
        .with_default(tracing_subscriber::filter::LevelFilter::INFO);

    for event in enabled_trace_events {
        let target = match event {
            TraceEvent::Commands => "commands",
            TraceEvent::Parse => "parse",
            TraceEvent::Tokenize => "tokenize",
        };
        filter = filter.with_target(target, tracing::Level::DEBUG);
    }

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
