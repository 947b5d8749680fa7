//! Pipeline execution.

use std::collections::VecDeque;
use std::io::Write;
use std::str::FromStr;

use shoal_parser::ast;

use crate::builtins::{self, BuiltinKind, ExitCode};
use crate::commands::{self, CommandSpawnResult, ExecutionContext, ExecutionParameters};
use crate::error;
use crate::expansion;
use crate::heredoc::{self, MaterializedHeredocs};
use crate::openfiles::{OpenFile, STDIN_FD, STDOUT_FD};
use crate::pathsearch::{self, ResolvedCommand};
use crate::redirect;
use crate::results::ExecutionResult;
use crate::shell::Shell;
use crate::sys;

/// Executes a parsed pipeline: materializes every here-document, spawns the
/// stages left to right with their standard streams chained, and reaps the
/// results in order. The last stage's status becomes the pipeline's.
pub(crate) async fn run_pipeline(
    shell: &mut Shell,
    pipeline: &ast::Pipeline,
    params: &ExecutionParameters,
) -> Result<ExecutionResult, error::Error> {
    // All here-documents are collected before anything spawns; a failure
    // here aborts the whole command line.
    let mut heredocs = match heredoc::materialize_all(shell, pipeline) {
        Ok(heredocs) => heredocs,
        Err(error::Error::Interrupted) => {
            if shell.options.interactive {
                writeln!(params.stderr()?)?;
            }
            shell.last_exit_status = 130;
            return Ok(ExecutionResult::new(130));
        }
        Err(e) => {
            writeln!(params.stderr()?, "{}: {e}", shell.display_name())?;
            shell.last_exit_status = 2;
            return Ok(ExecutionResult::new(2));
        }
    };

    let spawn_results = spawn_pipeline_stages(shell, pipeline, params, &mut heredocs).await?;
    let result = wait_for_pipeline_stages(shell, spawn_results).await?;

    // Keep the terminal tidy when the foreground command died from Ctrl-C.
    if shell.options.interactive && result.terminating_signal == Some(nix::libc::SIGINT) {
        writeln!(params.stderr()?)?;
    }

    shell.last_exit_status = result.exit_code;
    Ok(result)
}

async fn spawn_pipeline_stages(
    shell: &mut Shell,
    pipeline: &ast::Pipeline,
    params: &ExecutionParameters,
    heredocs: &mut MaterializedHeredocs,
) -> Result<VecDeque<CommandSpawnResult>, error::Error> {
    let pipeline_len = pipeline.stages.len();
    let mut spawn_results = VecDeque::with_capacity(pipeline_len);
    let mut next_stdin: Option<OpenFile> = None;

    for (stage_index, stage) in pipeline.stages.iter().enumerate() {
        let mut stage_params = params.try_clone()?;

        // Chain the standard streams: fd 0 comes from the previous stage's
        // pipe, and every stage but the last writes fd 1 into a fresh pipe.
        if let Some(reader) = next_stdin.take() {
            stage_params.open_files.set(STDIN_FD, reader);
        }
        if stage_index + 1 < pipeline_len {
            let (reader, writer) = sys::pipes::pipe()?;
            stage_params
                .open_files
                .set(STDOUT_FD, OpenFile::PipeWriter(writer));
            next_stdin = Some(OpenFile::PipeReader(reader));
        }

        // The stage takes ownership of its open files; the parent's copies
        // of the pipe ends close as soon as the stage is spawned, so
        // downstream EOF arrives exactly when the writer set is empty.
        spawn_results.push_back(
            execute_stage(
                shell,
                stage,
                stage_index,
                pipeline_len,
                stage_params,
                heredocs,
            )
            .await?,
        );
    }

    Ok(spawn_results)
}

async fn wait_for_pipeline_stages(
    shell: &mut Shell,
    mut spawn_results: VecDeque<CommandSpawnResult>,
) -> Result<ExecutionResult, error::Error> {
    let mut result = ExecutionResult::success();

    while let Some(spawned) = spawn_results.pop_front() {
        result = spawned.wait().await?;
        shell.last_exit_status = result.exit_code;
    }

    Ok(result)
}

async fn execute_stage(
    shell: &mut Shell,
    stage: &ast::SimpleCommand,
    stage_index: usize,
    pipeline_len: usize,
    mut params: ExecutionParameters,
    heredocs: &mut MaterializedHeredocs,
) -> Result<CommandSpawnResult, error::Error> {
    // Apply the stage's redirections, in order, over the pipe wiring. A
    // failed open fails only this stage; its siblings still run.
    for r in &stage.redirects {
        if let Err(e) = redirect::setup_redirect(shell, &mut params.open_files, stage_index, r, heredocs)
        {
            writeln!(params.stderr()?, "{}: {e}", shell.display_name())?;
            return Ok(CommandSpawnResult::ImmediateExit(1));
        }
    }

    let argv: Vec<String> = stage
        .words
        .iter()
        .filter_map(|word| expansion::expand_word(shell, word))
        .collect();

    // A redirection-only stage succeeds without running anything.
    let Some((command_name, args)) = argv.split_first() else {
        return Ok(CommandSpawnResult::ImmediateExit(0));
    };

    if let Ok(kind) = BuiltinKind::from_str(command_name) {
        execute_builtin(shell, kind, command_name, args, params, pipeline_len).await
    } else {
        execute_external(shell, command_name, args, params)
    }
}

/// Runs a builtin. A state-mutating builtin standing alone in its pipeline
/// runs in the shell's own context; any other builtin runs against a cloned
/// shell in a spawned task, with child-process semantics, so its mutations
/// stay invisible to the parent.
async fn execute_builtin(
    shell: &mut Shell,
    kind: BuiltinKind,
    command_name: &str,
    args: &[String],
    params: ExecutionParameters,
    pipeline_len: usize,
) -> Result<CommandSpawnResult, error::Error> {
    tracing::debug!(target: "commands", "running builtin: {command_name}");

    if pipeline_len == 1 && kind.mutates_shell_state() {
        let context = ExecutionContext {
            shell,
            command_name: command_name.to_owned(),
            params,
        };

        return match builtins::execute(kind, context, args).await? {
            ExitCode::ExitShell(code) => Ok(CommandSpawnResult::ExitShell(code)),
            code => Ok(CommandSpawnResult::ImmediateExit(code.status())),
        };
    }

    let mut subshell = shell.clone();
    let mut stderr = params.stderr()?;
    let display_name = shell.display_name().to_owned();
    let command_name = command_name.to_owned();
    let args = args.to_vec();

    let handle = tokio::task::spawn(async move {
        let context = ExecutionContext {
            shell: &mut subshell,
            command_name,
            params,
        };

        match builtins::execute(kind, context, &args).await {
            Ok(code) => code.status(),
            Err(e) => {
                writeln!(stderr, "{display_name}: {e}").ok();
                1
            }
        }
    });

    Ok(CommandSpawnResult::SpawnedBuiltin(handle))
}

fn execute_external(
    shell: &Shell,
    command_name: &str,
    args: &[String],
    params: ExecutionParameters,
) -> Result<CommandSpawnResult, error::Error> {
    let mut stderr = params.stderr()?;

    let path = match pathsearch::resolve(
        shell.env.get_str("PATH"),
        command_name,
        &shell.working_dir,
    ) {
        ResolvedCommand::Found(path) => path,
        ResolvedCommand::NotFound => {
            let reason = if command_name.contains('/') {
                "No such file or directory"
            } else {
                "command not found"
            };
            writeln!(stderr, "{}: {command_name}: {reason}", shell.display_name())?;
            return Ok(CommandSpawnResult::ImmediateExit(127));
        }
        ResolvedCommand::NotExecutable(path) => {
            let reason = if path.is_dir() {
                "Is a directory"
            } else {
                "Permission denied"
            };
            writeln!(stderr, "{}: {command_name}: {reason}", shell.display_name())?;
            return Ok(CommandSpawnResult::ImmediateExit(126));
        }
    };

    tracing::debug!(target: "commands", "spawning: {}", path.display());

    let cmd = commands::compose_std_command(
        shell,
        path.as_os_str(),
        command_name,
        args,
        params.open_files,
    )?;

    match commands::spawn_external(cmd) {
        Ok(child) => Ok(CommandSpawnResult::SpawnedProcess(child)),
        Err(e) => {
            let (code, reason) = commands::launch_failure_status(&e);
            writeln!(stderr, "{}: {command_name}: {reason}", shell.display_name())?;
            Ok(CommandSpawnResult::ImmediateExit(code))
        }
    }
}
