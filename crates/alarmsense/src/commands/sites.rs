//! `alarmsense sites`

use tabled::Tabled;

use alarmsense_core::Site;

use super::Context;
use super::util::{check_source, with_spinner};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
        }
    }
}

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let sites = with_spinner("Loading sites", ctx.global, ctx.provider.list_sites()).await;
    check_source(&sites.source, ctx.global)?;

    let out = output::render_list(
        ctx.format,
        &sites.data,
        |s| SiteRow::from(s),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
