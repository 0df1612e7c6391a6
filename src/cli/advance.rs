use colored::Colorize;

use crate::actions::{ActionSink, ActionTracker, OutboxSink};
use crate::cli::Context;
use crate::error::{PaylensError, Result};
use crate::validation::{validate_advance, AdvanceDraft, AdvanceKind};

pub const OUTBOX_FILE: &str = "outbox.jsonl";

pub fn submit(ctx: &Context, draft: AdvanceDraft) -> Result<()> {
    let mut sink = OutboxSink::new(ctx.data_dir().join(OUTBOX_FILE));
    submit_to(ctx, draft, &mut sink)
}

fn submit_to(ctx: &Context, draft: AdvanceDraft, sink: &mut dyn ActionSink) -> Result<()> {
    let valid = match validate_advance(&draft) {
        Ok(v) => v,
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {} {}", format!("{field}:").red(), message);
            }
            return Err(PaylensError::Validation(errors));
        }
    };

    let kind = valid.request.kind;
    let mut tracker = ActionTracker::new();
    if !tracker.dispatch(sink, valid.request) {
        let banner = tracker
            .banner(kind)
            .unwrap_or_else(|| format!("Failed to {}. Please try again.", kind.verb()));
        return Err(PaylensError::Other(banner));
    }

    println!(
        "Queued {} for {}: {} over {} installment(s) of {}",
        draft.kind.label(),
        draft.employee_number.trim(),
        ctx.money(draft.amount),
        valid.installments,
        ctx.money(draft.amortization),
    );
    Ok(())
}

pub fn parse_kind(raw: &str) -> Result<AdvanceKind> {
    AdvanceKind::from_key(raw).ok_or_else(|| PaylensError::UnknownKind(raw.to_string()))
}
