use std::path::Path;

use lotledger_core::{CommandResponse, LedgerCommand};
use lotledger_domain::{format_timestamp, Identifiable};

use super::usage_error;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};
use crate::report::{write_json_report, InventoryReport};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "inventory",
            "List open lots, oldest first",
            "inventory",
            cmd_inventory,
        ),
        CommandEntry::new(
            "used",
            "List consumed lot slices per liquidation",
            "used",
            cmd_used,
        ),
        CommandEntry::new(
            "transactions",
            "List all journal transactions in replay order",
            "transactions",
            cmd_transactions,
        ),
        CommandEntry::new("stats", "Show inventory statistics", "stats", cmd_stats),
        CommandEntry::new(
            "available",
            "Show quantity available to sell",
            "available",
            cmd_available,
        ),
        CommandEntry::new(
            "export",
            "Write an inventory report as JSON",
            "export <path>",
            cmd_export,
        ),
    ]
}

fn cmd_inventory(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let CommandResponse::OpenInventory(lots) = context.execute(LedgerCommand::ListOpenInventory)?
    else {
        return Err(unexpected());
    };
    output::section("Open inventory");
    if lots.is_empty() {
        io::print_info("No open lots.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Lot"),
        TableColumn::left("Purchased"),
        TableColumn::right("Remaining"),
        TableColumn::right("Original"),
        TableColumn::right("Unit price"),
        TableColumn::right("Value"),
    ]);
    for lot in &lots {
        table.push_row(vec![
            lot.purchase_id.to_string(),
            format_timestamp(lot.purchased_at),
            context.format_quantity(lot.remaining_quantity),
            context.format_quantity(lot.original_quantity),
            context.format_amount(lot.unit_price),
            context.format_amount(lot.remaining_value()),
        ]);
    }
    output::raw(table.render());
    Ok(())
}

fn cmd_used(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let CommandResponse::UsedInventory(used) = context.execute(LedgerCommand::ListUsedInventory)?
    else {
        return Err(unexpected());
    };
    output::section("Used inventory");
    if used.is_empty() {
        io::print_info("No liquidations recorded.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Sale"),
        TableColumn::left("Lot"),
        TableColumn::left("Sold"),
        TableColumn::right("Quantity"),
        TableColumn::right("Unit price"),
        TableColumn::right("Sell price"),
        TableColumn::right("Cost"),
        TableColumn::right("Revenue"),
    ]);
    for slice in &used {
        table.push_row(vec![
            slice.liquidation_id.to_string(),
            slice.purchase_id.to_string(),
            format_timestamp(slice.liquidated_at),
            context.format_quantity(slice.quantity),
            context.format_amount(slice.unit_price),
            context.format_amount(slice.selling_price),
            context.format_amount(slice.orig_value()),
            context.format_amount(slice.sell_value()),
        ]);
    }
    output::raw(table.render());
    Ok(())
}

fn cmd_transactions(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let CommandResponse::Transactions(events) =
        context.execute(LedgerCommand::ListAllTransactions)?
    else {
        return Err(unexpected());
    };
    output::section("Transactions");
    if events.is_empty() {
        io::print_info("Journal is empty.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Kind"),
        TableColumn::left("Timestamp"),
        TableColumn::right("Quantity"),
        TableColumn::right("Price"),
        TableColumn::right("Total"),
    ]);
    for event in &events {
        table.push_row(vec![
            event.id().to_string(),
            event.kind().to_string(),
            format_timestamp(event.timestamp()),
            context.format_quantity(event.quantity()),
            context.format_amount(event.price()),
            context.format_amount(event.quantity() * event.price()),
        ]);
    }
    output::raw(table.render());
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let CommandResponse::Statistics(stats) = context.execute(LedgerCommand::ComputeStatistics)?
    else {
        return Err(unexpected());
    };
    output::section("Statistics");
    let rows = [
        ("Acquisition value", context.format_amount(stats.acquisition_value)),
        ("Realized cost", context.format_amount(stats.orig_value)),
        ("Realized revenue", context.format_amount(stats.sell_value)),
        ("Realized gain", context.format_amount(stats.realized_gain())),
        ("Open quantity", context.format_quantity(stats.open_quantity)),
        ("Sold quantity", context.format_quantity(stats.sold_quantity)),
    ];
    for (label, value) in rows {
        io::print_info(format!("{label:<18} {value}"));
    }
    Ok(())
}

fn cmd_available(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let available = context.ledger()?.available_quantity();
    io::print_info(format!(
        "Available quantity: {}",
        context.format_quantity(available)
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage_error("export <path>"));
    };
    let report = InventoryReport::from_ledger(context.ledger()?, context.currency());
    let path = Path::new(path);
    write_json_report(&report, path)?;
    io::print_success(format!("Report written to {}", path.display()));
    Ok(())
}

fn unexpected() -> CommandError {
    CommandError::Message("unexpected ledger response".into())
}
