//! Implements the command-line interface for the `shoal` shell.

mod args;
mod events;
mod productinfo;
mod repl;

use clap::Parser;
use shoal_core::{CreateOptions, InputSource, Shell};

use crate::args::CommandLineArgs;

/// Main entry point for the `shoal` shell.
fn main() {
    //
    // Set up panic handler. On release builds, it will capture panic details to a
    // temporary .toml file and report a human-readable message to the screen.
    //
    human_panic::setup_panic!(human_panic::Metadata::new(
        env!("CARGO_BIN_NAME"),
        env!("CARGO_PKG_VERSION")
    )
    .homepage(productinfo::PRODUCT_DISPLAY_URI));

    let parsed_args = CommandLineArgs::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}: failed to start runtime: {e}", productinfo::PRODUCT_NAME);
            std::process::exit(1);
        }
    };

    let exit_code = match runtime.block_on(run(parsed_args)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", productinfo::PRODUCT_NAME);
            1
        }
    };

    std::process::exit(i32::from(exit_code));
}

/// Runs the shell to completion. Returns the exit code.
async fn run(args: CommandLineArgs) -> Result<u8, shoal_core::Error> {
    events::init_tracing(&args.enabled_log_events);
    shoal_core::traps::initialize_signal_handling()?;

    let interactive = args.is_interactive();

    // Decide where lines come from and what `$0`.. name.
    let (input, mut positional_parameters) = if let Some(command) = &args.command {
        // With -c, a trailing positional names `$0`.
        let name = args
            .script_path
            .clone()
            .unwrap_or_else(|| productinfo::PRODUCT_NAME.to_owned());
        (InputSource::from_string(command.clone()), vec![name])
    } else if let Some(script_path) = &args.script_path {
        (InputSource::script(script_path)?, vec![script_path.clone()])
    } else {
        (
            InputSource::stdin(),
            vec![productinfo::PRODUCT_NAME.to_owned()],
        )
    };
    positional_parameters.extend(args.script_args.iter().cloned());

    let options = CreateOptions {
        interactive,
        shell_name: Some(productinfo::PRODUCT_NAME.to_owned()),
        positional_parameters,
    };

    let mut shell = Shell::new(&options, input)?;
    repl::run_loop(&mut shell).await
}
