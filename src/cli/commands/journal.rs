use std::path::{Path, PathBuf};

use lotledger_core::storage::JournalStorage;
use lotledger_storage_json::canonical_name;

use super::usage_error;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{JournalLocation, ShellContext};
use crate::cli::table::{Table, TableColumn};

const JOURNAL_USAGE: &str =
    "journal [new <name> | save [path] | load <name|path> | list | backup [note] | backups | restore <n|id>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "journal",
        "Create, save, load, and back up journals",
        JOURNAL_USAGE,
        cmd_journal,
    )]
}

fn cmd_journal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return show_active(context);
    };
    match sub.to_ascii_lowercase().as_str() {
        "new" => journal_new(context, rest),
        "save" => journal_save(context, rest),
        "load" => journal_load(context, rest),
        "list" => journal_list(context),
        "backup" => journal_backup(context, rest),
        "backups" => journal_backups(context),
        "restore" => journal_restore(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown journal action `{other}`; usage: {JOURNAL_USAGE}"
        ))),
    }
}

fn show_active(context: &ShellContext) -> CommandResult {
    let ledger = context.ledger()?;
    output::section(format!("Journal: {}", ledger.name()));
    let location = match &context.location {
        Some(JournalLocation::Named(slug)) => context.storage.journal_path(slug),
        Some(JournalLocation::File(path)) => path.clone(),
        None => PathBuf::from("(unsaved)"),
    };
    io::print_info(format!("Location     : {}", location.display()));
    io::print_info(format!("Transactions : {}", ledger.event_count()));
    io::print_info(format!("Status       : {:?}", ledger.status()));
    io::print_info(format!(
        "Last change  : {}",
        ledger.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if context.dirty {
        io::print_warning("Unsaved changes.");
    }
    Ok(())
}

fn journal_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("journal new <name>"));
    }
    let name = args.join(" ");
    context.start_journal(&name);
    io::print_success(format!("New journal `{name}` created."));
    io::print_hint(format!(
        "It will be saved as `{}` with `journal save`.",
        canonical_name(&name)
    ));
    Ok(())
}

fn journal_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args {
        [] => None,
        [path] => Some(PathBuf::from(path)),
        _ => return Err(usage_error("journal save [path]")),
    };
    let written = context.save_active(target.as_deref())?;
    io::print_success(format!("Journal saved to {}", written.display()));
    Ok(())
}

fn journal_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("journal load <name|path>"));
    };
    let as_path = Path::new(target);
    let (journal, location) = if looks_like_path(target) && as_path.exists() {
        (
            context.storage.load_journal_from_path(as_path)?,
            JournalLocation::File(as_path.to_path_buf()),
        )
    } else {
        let slug = canonical_name(target);
        (
            context.storage.load_journal(&slug)?,
            JournalLocation::Named(slug),
        )
    };
    let name = journal.name.clone();
    context.adopt_journal(journal, location.clone())?;
    if let JournalLocation::Named(slug) = location {
        context.set_last_opened(Some(slug))?;
    }
    io::print_success(format!("Journal `{name}` loaded."));
    Ok(())
}

fn looks_like_path(target: &str) -> bool {
    target.contains(std::path::MAIN_SEPARATOR) || target.contains('/') || target.ends_with(".json")
}

fn journal_list(context: &ShellContext) -> CommandResult {
    let rows = context.storage.list_journal_metadata()?;
    output::section("Saved journals");
    if rows.is_empty() {
        io::print_info("No saved journals.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Slug"),
        TableColumn::left("Name"),
        TableColumn::right("Transactions"),
        TableColumn::left("Updated"),
    ]);
    for row in rows {
        table.push_row(vec![
            row.slug,
            row.name,
            row.event_count.to_string(),
            row.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    output::raw(table.render());
    Ok(())
}

fn journal_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let journal = context.ledger()?.journal();
    let slug = context.active_slug()?;
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context
        .storage
        .backup_journal(&slug, &journal, note.as_deref())?;
    io::print_success(format!("Backup `{}` created.", info.id));
    Ok(())
}

fn journal_backups(context: &ShellContext) -> CommandResult {
    let slug = context.active_slug()?;
    let backups = context.storage.list_backup_metadata(&slug)?;
    output::section(format!("Backups for `{slug}`"));
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Backup"),
        TableColumn::left("Created"),
        TableColumn::right("Bytes"),
    ]);
    for (idx, backup) in backups.iter().enumerate() {
        table.push_row(vec![
            (idx + 1).to_string(),
            backup.name.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into()),
            backup.size_bytes.to_string(),
        ]);
    }
    output::raw(table.render());
    Ok(())
}

fn journal_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [selector] = args else {
        return Err(usage_error("journal restore <n|backup-id>"));
    };
    let slug = context.active_slug()?;
    let backups = context.storage.list_backups(&slug)?;
    let chosen = match selector.parse::<usize>() {
        Ok(index) if index >= 1 => backups.get(index - 1),
        _ => backups.iter().find(|backup| backup.id == *selector),
    }
    .ok_or_else(|| CommandError::InvalidArguments(format!("no backup matches `{selector}`")))?
    .clone();

    let journal = context.storage.restore_backup(&chosen)?;
    context.adopt_journal(journal, JournalLocation::Named(slug))?;
    io::print_success(format!("Restored backup `{}`.", chosen.id));
    Ok(())
}
