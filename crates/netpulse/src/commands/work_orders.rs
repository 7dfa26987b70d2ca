//! Work-order command handlers.

use std::sync::Arc;

use tabled::Tabled;

use netpulse_core::aggregate::Group;
use netpulse_core::view::WorkOrderOverview;
use netpulse_core::{Engine, Facet, WorkOrder};

use crate::cli::WorkOrdersArgs;
use crate::error::CliError;
use crate::output;

use super::{RenderCtx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct WorkOrderRow {
    #[tabled(rename = "Ticket")]
    ticket: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Team")]
    team: &'static str,
    #[tabled(rename = "Vendor")]
    vendor: &'static str,
    #[tabled(rename = "Region")]
    region: &'static str,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Arc<WorkOrder>> for WorkOrderRow {
    fn from(w: &Arc<WorkOrder>) -> Self {
        Self {
            ticket: w.ticket_number.clone(),
            status: w.status.literal(),
            priority: w.priority.literal(),
            team: w.team.literal(),
            vendor: w.vendor.literal(),
            region: w.region.literal(),
            description: w.description.clone(),
            updated: w.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Group")]
    key: &'static str,
    #[tabled(rename = "Tickets")]
    count: usize,
}

fn counts<K: Facet>(title: &str, groups: &[Group<K>], color: bool) -> String {
    format!(
        "{}\n{}",
        output::heading(title, color),
        output::render_table(groups.iter().map(|g| CountRow {
            key: g.key.literal(),
            count: g.count,
        }))
    )
}

fn tables(view: &WorkOrderOverview, ctx: &RenderCtx) -> Vec<String> {
    let listed = if view.work_orders.is_empty() {
        "No work orders match the current filters".to_owned()
    } else {
        output::render_table(view.work_orders.iter().map(WorkOrderRow::from))
    };
    vec![
        counts("Tickets by team", &view.by_team, ctx.color),
        counts("Tickets by status", &view.by_status, ctx.color),
        listed,
    ]
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &WorkOrdersArgs, engine: &Engine, ctx: &RenderCtx) -> Result<(), CliError> {
    let view = WorkOrderOverview::from_store(engine.store(), &args.to_filter());
    tracing::debug!(listed = view.work_orders.len(), "work-order overview built");

    if let Some(ref path) = args.export {
        util::export_to(path, &view.work_orders, ctx.quiet)?;
    }

    let out = output::render_view(ctx.format, &view, |v| tables(v, ctx))?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
