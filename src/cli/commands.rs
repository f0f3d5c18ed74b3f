//! Command dispatch

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{EditorSession, ScriptFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::repl::EditLoop;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{TreeArena, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    debug!("project_dir: {}", project_dir.display());

    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given (try 'dirsketch --help')".to_string(),
        ));
    };

    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Show { input, outline } => cmd_show(&container, input, *outline),
        Commands::Emit {
            input,
            format,
            output,
        } => cmd_emit(&container, input, *format, output.as_deref()),
        Commands::Edit { input } => cmd_edit(&container, input),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Parse `input`, reading stdin for `-`.
fn load_tree(container: &ServiceContainer, input: &Path) -> CliResult<TreeArena> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| InfraError::io("read stdin", e))?;
        Ok(container.structure.parse(&text)?)
    } else {
        Ok(container.structure.load_file(input)?)
    }
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, input: &Path, outline: bool) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    if outline {
        print!("{}", container.structure.outline(&tree));
    } else {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_emit(
    container: &ServiceContainer,
    input: &Path,
    format: Option<ScriptFormat>,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    let script = container.structure.script(&tree, format)?;
    match output_path {
        Some(path) => {
            container.structure.write_output(path, &script)?;
            output::action("Wrote", &path.display());
        }
        None => print!("{}", script),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_edit(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    if input == Path::new("-") {
        return Err(CliError::InvalidArgs(
            "edit reads commands from stdin; pass a structure file".to_string(),
        ));
    }
    let tree = load_tree(container, input)?;
    let session = EditorSession::from_tree(tree);
    let mut editor = EditLoop::new(&container.structure, session);
    editor.run(io::stdin().lock())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_config_path(project_dir);
            output::header("Config files");
            match global {
                Some(path) => output::detail(&describe_path("global", &path, container)),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&describe_path("local", &local, container));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path: PathBuf = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .structure
                .write_output(&path, &Settings::template())?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

fn describe_path(label: &str, path: &Path, container: &ServiceContainer) -> String {
    let state = if container.fs.exists(path) {
        "exists"
    } else {
        "missing"
    };
    format!("{}: {} ({})", label, path.display(), state)
}
