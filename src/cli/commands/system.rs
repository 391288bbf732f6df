use lotledger_domain::CURRENT_SCHEMA_VERSION;

use crate::cli::error::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Lot Ledger {}", meta.version));
    io::print_info(format!("  Journal schema: v{}", CURRENT_SCHEMA_VERSION));
    io::print_info(format!(
        "  Build hash    : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at      : {}", meta.timestamp));
    io::print_info(format!("  Target        : {}", meta.target));
    io::print_info(format!("  Profile       : {}", meta.profile));
    io::print_info(format!("  Rustc         : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        match context.command(&raw.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(raw),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm_exit()? {
        return Ok(());
    }
    Err(CommandError::ExitRequested)
}
