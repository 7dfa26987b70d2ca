//! Alarm command handlers.

use std::sync::Arc;

use tabled::Tabled;

use netpulse_core::aggregate::Group;
use netpulse_core::view::AlarmOverview;
use netpulse_core::{Alarm, AlarmStatus, Command as CoreCommand, EntityId, Engine, Facet};

use crate::cli::AlarmsArgs;
use crate::error::CliError;
use crate::output;

use super::{RenderCtx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlarmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    status: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Vendor")]
    vendor: &'static str,
    #[tabled(rename = "Tech")]
    technology: &'static str,
    #[tabled(rename = "Region")]
    region: &'static str,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Raised")]
    timestamp: String,
    #[tabled(rename = "Ack")]
    acknowledged: &'static str,
}

impl AlarmRow {
    fn new(a: &Arc<Alarm>, color: bool) -> Self {
        Self {
            id: a.id.to_string(),
            status: output::severity(a.status, color),
            site: a.site_name.clone(),
            vendor: a.vendor.literal(),
            technology: a.technology.literal(),
            region: a.region.literal(),
            description: a.description.clone(),
            timestamp: a.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            acknowledged: if a.acknowledged { "yes" } else { "no" },
        }
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Severity")]
    status: String,
    #[tabled(rename = "Alarms")]
    count: usize,
}

fn count_row(g: &Group<AlarmStatus>, color: bool) -> CountRow {
    CountRow {
        status: output::severity(g.key, color),
        count: g.count,
    }
}

fn tables(view: &AlarmOverview, ctx: &RenderCtx) -> Vec<String> {
    let listed = if view.alarms.is_empty() {
        "No alarms match the current filters".to_owned()
    } else {
        output::render_table(view.alarms.iter().map(|a| AlarmRow::new(a, ctx.color)))
    };
    vec![
        format!(
            "{}\n{}",
            output::heading(
                &format!("Unacknowledged: {}", view.unacknowledged),
                ctx.color
            ),
            output::render_table(view.status_counts.iter().map(|g| count_row(g, ctx.color)))
        ),
        listed,
    ]
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &AlarmsArgs, engine: &Engine, ctx: &RenderCtx) -> Result<(), CliError> {
    let mut live = AlarmOverview::watch(engine.store(), args.to_filter());

    for raw in &args.toggle {
        let id = EntityId::from(raw.as_str());
        if engine.store().alarm_by_id(&id).is_none() {
            tracing::warn!(%id, "no alarm with this id; toggle skipped");
            if !ctx.quiet {
                eprintln!("No alarm '{id}' in the current dataset");
            }
            continue;
        }
        engine.execute(CoreCommand::ToggleAcknowledged { id })?;
    }

    if live.refresh() {
        tracing::debug!(version = live.version(), "alarm overview re-derived after toggles");
    }
    let mut view = live.into_current();
    if args.by_severity {
        view = view.by_severity();
    }
    tracing::debug!(listed = view.alarms.len(), "alarm overview built");

    if let Some(ref path) = args.export {
        util::export_to(path, &view.alarms, ctx.quiet)?;
    }

    let out = output::render_view(ctx.format, &view, |v| tables(v, ctx))?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
