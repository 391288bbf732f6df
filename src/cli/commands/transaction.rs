use lotledger_core::{command::Receipt, CommandResponse, LedgerCommand};
use lotledger_domain::{Displayable, EventDraft, EventKind, Identifiable};

use super::{parse_event_id, parse_number, parse_optional_timestamp, usage_error};
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CliMode, ShellContext};

const PURCHASE_USAGE: &str = "purchase <quantity> <unit-price> [YYYY-MM-DD [HH:MM:SS]]";
const SELL_USAGE: &str = "sell <quantity> <selling-price> [YYYY-MM-DD [HH:MM:SS]]";
const REMOVE_USAGE: &str = "remove <id>";
const AMEND_USAGE: &str =
    "amend <id> <purchase|sell> <quantity> <price> [YYYY-MM-DD [HH:MM:SS]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "purchase",
            "Record a purchase lot",
            PURCHASE_USAGE,
            cmd_purchase,
        ),
        CommandEntry::new(
            "sell",
            "Record a liquidation consumed FIFO",
            SELL_USAGE,
            cmd_sell,
        ),
        CommandEntry::new("remove", "Remove a transaction", REMOVE_USAGE, cmd_remove),
        CommandEntry::new(
            "amend",
            "Replace a transaction's contents",
            AMEND_USAGE,
            cmd_amend,
        ),
        CommandEntry::new(
            "resync",
            "Rebuild inventory by replaying the journal",
            "resync",
            cmd_resync,
        ),
    ]
}

fn cmd_purchase(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [quantity, price, rest @ ..] = args else {
        return Err(usage_error(PURCHASE_USAGE));
    };
    let quantity = parse_number(quantity, "quantity")?;
    let unit_price = parse_number(price, "unit price")?;
    let timestamp = parse_optional_timestamp(rest)?.unwrap_or_else(|| context.now());

    let response = context.execute(LedgerCommand::RecordPurchase {
        quantity,
        unit_price,
        timestamp,
    })?;
    report_receipt(context, response, EventKind::Purchase)
}

fn cmd_sell(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [quantity, price, rest @ ..] = args else {
        return Err(usage_error(SELL_USAGE));
    };
    let quantity = parse_number(quantity, "quantity")?;
    let selling_price = parse_number(price, "selling price")?;
    let timestamp = parse_optional_timestamp(rest)?.unwrap_or_else(|| context.now());

    let response = context.execute(LedgerCommand::RecordLiquidation {
        quantity,
        selling_price,
        timestamp,
    })?;
    report_receipt(context, response, EventKind::Liquidation)
}

fn report_receipt(
    context: &ShellContext,
    response: CommandResponse,
    kind: EventKind,
) -> CommandResult {
    let CommandResponse::Recorded(Receipt { event_id, snapshot }) = response else {
        return Err(CommandError::Message("unexpected ledger response".into()));
    };
    let Some(event) = snapshot.transactions.iter().find(|e| e.id() == event_id) else {
        return Err(CommandError::Message(format!(
            "transaction {event_id} missing after commit"
        )));
    };
    io::print_success(format!(
        "Recorded {} {}: {} @ {}",
        kind.to_string().to_lowercase(),
        event_id,
        context.format_quantity(event.quantity()),
        context.format_amount(event.price()),
    ));
    if kind == EventKind::Liquidation {
        let lots = snapshot
            .used_lots
            .iter()
            .filter(|used| used.liquidation_id == event_id)
            .count();
        io::print_info(format!(
            "Consumed {} lot(s); {} remaining in inventory.",
            lots,
            context.format_quantity(snapshot.statistics.open_quantity)
        ));
    }
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage_error(REMOVE_USAGE));
    };
    let id = parse_event_id(id)?;
    let event = context
        .ledger()?
        .transaction(id)
        .ok_or(lotledger_core::CoreError::NotFound(id))?;

    if context.mode == CliMode::Interactive {
        let prompt = format!("Remove {}?", event.display_label());
        if !io::confirm_action(&prompt, false)? {
            io::print_info("Removal cancelled.");
            return Ok(());
        }
    }

    context.execute(LedgerCommand::RemoveTransaction { id })?;
    io::print_success(format!("Removed transaction {id}."));
    Ok(())
}

fn cmd_amend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, kind, quantity, price, rest @ ..] = args else {
        return Err(usage_error(AMEND_USAGE));
    };
    let id = parse_event_id(id)?;
    let quantity = parse_number(quantity, "quantity")?;
    let price = parse_number(price, "price")?;
    let timestamp = match parse_optional_timestamp(rest)? {
        Some(timestamp) => timestamp,
        None => context
            .ledger()?
            .transaction(id)
            .map(|event| event.timestamp())
            .ok_or(lotledger_core::CoreError::NotFound(id))?,
    };
    let draft = match kind.to_ascii_lowercase().as_str() {
        "purchase" | "buy" => EventDraft::purchase(quantity, price, timestamp),
        "sell" | "liquidation" => EventDraft::liquidation(quantity, price, timestamp),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown transaction kind `{other}` (use purchase or sell)"
            )))
        }
    };

    context.execute(LedgerCommand::AmendTransaction { id, draft })?;
    io::print_success(format!("Amended transaction {id}."));
    Ok(())
}

fn cmd_resync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let CommandResponse::Updated(snapshot) = context.execute(LedgerCommand::Resynchronize)? else {
        return Err(CommandError::Message("unexpected ledger response".into()));
    };
    io::print_success(format!(
        "Replayed {} transaction(s); {} open lot(s).",
        snapshot.transactions.len(),
        snapshot.open_lots.len()
    ));
    Ok(())
}
