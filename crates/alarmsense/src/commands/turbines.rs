//! `alarmsense turbines --site <ID>`

use tabled::Tabled;

use alarmsense_core::Turbine;

use super::Context;
use super::util::{check_source, with_spinner};
use crate::cli::TurbinesArgs;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TurbineRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Site")]
    site_id: String,
}

impl From<&Turbine> for TurbineRow {
    fn from(t: &Turbine) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            site_id: t.site_id.clone(),
        }
    }
}

pub async fn handle(args: TurbinesArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    if args.site.trim().is_empty() {
        return Err(CliError::Validation {
            field: "site".into(),
            reason: "must not be empty".into(),
        });
    }

    let turbines = with_spinner(
        "Loading turbines",
        ctx.global,
        ctx.provider.list_turbines(&args.site),
    )
    .await;
    check_source(&turbines.source, ctx.global)?;

    let out = output::render_list(
        ctx.format,
        &turbines.data,
        |t| TurbineRow::from(t),
        |t| t.id.clone(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
