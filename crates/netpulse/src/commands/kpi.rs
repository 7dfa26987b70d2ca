//! KPI summary handler.

use netpulse_core::view::KpiOverview;
use netpulse_core::{Engine, Facet, RowFormat};

use crate::cli::KpiArgs;
use crate::error::CliError;
use crate::output::{self, MeanRow};

use super::RenderCtx;

fn tables(view: &KpiOverview, ctx: &RenderCtx) -> Vec<String> {
    let title = format!(
        "{} KPIs over {} sample(s)",
        view.technology.literal(),
        view.summary.count
    );
    vec![format!(
        "{}\n{}",
        output::heading(&title, ctx.color),
        output::render_table(view.summary.means.iter().map(MeanRow::from))
    )]
}

pub fn handle(args: &KpiArgs, engine: &Engine, ctx: &RenderCtx) -> Result<(), CliError> {
    let view = KpiOverview::from_store(engine.store(), args.generation.technology());

    if let Some(ref path) = args.export {
        let kind = args.generation.kind();
        let body = engine.export(kind, RowFormat::from_path(path)?)?;
        std::fs::write(path, body)?;
        if !ctx.quiet {
            eprintln!("Exported {kind} series to {}", path.display());
        }
    }

    let out = output::render_view(ctx.format, &view, |v| tables(v, ctx))?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
