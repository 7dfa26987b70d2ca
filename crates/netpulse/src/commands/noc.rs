//! NOC overview handler.

use std::sync::Arc;

use tabled::Tabled;

use netpulse_core::aggregate::Group;
use netpulse_core::view::NocOverview;
use netpulse_core::{Engine, Facet, NetworkRecord};

use crate::cli::NocArgs;
use crate::error::CliError;
use crate::output::{self, MeanRow};

use super::{RenderCtx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    key: &'static str,
    #[tabled(rename = "Sites")]
    count: usize,
    #[tabled(rename = "Mean")]
    mean: String,
}

impl<K: Facet> From<&Group<K>> for GroupRow {
    fn from(g: &Group<K>) -> Self {
        Self {
            key: g.key.literal(),
            count: g.count,
            mean: g
                .means
                .first()
                .map_or_else(|| "-".into(), |m| output::fmt_mean(m.mean)),
        }
    }
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Vendor")]
    vendor: &'static str,
    #[tabled(rename = "Tech")]
    technology: &'static str,
    #[tabled(rename = "Region")]
    region: &'static str,
    #[tabled(rename = "Avail %")]
    availability: String,
    #[tabled(rename = "Mbps")]
    throughput: String,
    #[tabled(rename = "Latency ms")]
    latency: String,
}

impl From<&Arc<NetworkRecord>> for SiteRow {
    fn from(r: &Arc<NetworkRecord>) -> Self {
        Self {
            id: r.id.to_string(),
            site: r.site_name.clone(),
            vendor: r.vendor.literal(),
            technology: r.technology.literal(),
            region: r.region.literal(),
            availability: output::fmt_mean(r.availability),
            throughput: output::fmt_mean(r.throughput),
            latency: output::fmt_mean(r.latency),
        }
    }
}

fn grouped<K: Facet>(title: &str, groups: &[Group<K>], ctx: &RenderCtx) -> String {
    format!(
        "{}\n{}",
        output::heading(title, ctx.color),
        output::render_table(groups.iter().map(GroupRow::from))
    )
}

fn tables(view: &NocOverview, ctx: &RenderCtx, list_sites: bool) -> Vec<String> {
    let mut sections = vec![
        format!(
            "{}\n{}",
            output::heading(&format!("Sites: {}", view.summary.count), ctx.color),
            output::render_table(view.summary.means.iter().map(MeanRow::from))
        ),
        grouped("Availability by vendor", &view.by_vendor, ctx),
        grouped("Throughput by technology", &view.by_technology, ctx),
        grouped("Sites by region", &view.by_region, ctx),
    ];
    if list_sites {
        sections.push(output::render_table(view.records.iter().map(SiteRow::from)));
    }
    sections
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &NocArgs, engine: &Engine, ctx: &RenderCtx) -> Result<(), CliError> {
    let view = NocOverview::from_store(engine.store(), &args.filter.to_filter());
    tracing::debug!(sites = view.summary.count, "noc overview built");

    if let Some(ref path) = args.export {
        util::export_to(path, &view.records, ctx.quiet)?;
    }

    let out = output::render_view(ctx.format, &view, |v| tables(v, ctx, args.sites))?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
