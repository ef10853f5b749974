//! `alarmsense search`: validate, query, narrow, page, render.

use tabled::Tabled;

use alarmsense_core::{
    DataSource, Pager, ResultCriteria, RootCauseResult, SearchState, SubmitError, filter_results,
};

use super::Context;
use super::util::{check_source, with_spinner};
use crate::cli::{CriteriaArgs, FilterArgs, OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Root Cause")]
    root_cause: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

impl From<&RootCauseResult> for ResultRow {
    fn from(r: &RootCauseResult) -> Self {
        Self {
            id: r.id.clone(),
            start: r.start_label(),
            end: r.end_label(),
            duration: r
                .rounded_duration_minutes()
                .map_or_else(|| "-".into(), |m| format!("{m} min")),
            root_cause: r.root_cause_name.clone(),
            code: r.alarm_code.clone(),
            class: r.class.clone(),
            priority: format!("{} {}", r.priority, r.priority.severity()),
        }
    }
}

/// A completed search after client-side narrowing.
pub(super) struct Outcome {
    /// Records that passed the criteria, in backend order.
    pub results: Vec<RootCauseResult>,
    /// Size of the set before narrowing.
    pub fetched: usize,
    pub source: DataSource,
}

/// Shared by `search` and `export`: run the query through the form state
/// machine so validation and response handling match the dashboard.
pub(super) async fn run(
    filter: &FilterArgs,
    criteria: &CriteriaArgs,
    ctx: &Context<'_>,
) -> Result<Outcome, CliError> {
    let mut state = SearchState::new();
    state.set_site(filter.site.clone().unwrap_or_default());
    state.set_turbine(filter.turbine.clone().unwrap_or_default());
    state.set_start(filter.start);
    state.set_end(filter.end);

    let ticket = state.submit().map_err(|e| match e {
        SubmitError::Invalid(errors) => CliError::from(errors),
        SubmitError::Busy => CliError::Core {
            message: "a search is already in flight".into(),
        },
    })?;

    let response = with_spinner(
        "Searching root causes",
        ctx.global,
        ctx.provider.find_root_cause(&ticket.filter),
    )
    .await;
    state.complete(ticket.generation, response);

    let source = state.source().cloned().unwrap_or(DataSource::Live);
    check_source(&source, ctx.global)?;

    let criteria = build_criteria(criteria, ctx);
    let results = filter_results(state.results(), &criteria);
    tracing::debug!(
        fetched = state.results().len(),
        kept = results.len(),
        "applied result criteria"
    );

    Ok(Outcome {
        results,
        fetched: state.results().len(),
        source,
    })
}

fn build_criteria(args: &CriteriaArgs, ctx: &Context<'_>) -> ResultCriteria {
    ResultCriteria {
        text: args.query.clone().unwrap_or_default(),
        mode: args.match_mode.unwrap_or(ctx.default_match),
        priority: args.priority,
        from: args.from,
        to: args.to,
        min_duration: args.min_duration,
        max_duration: args.max_duration,
    }
}

pub async fn handle(args: SearchArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let outcome = run(&args.filter, &args.criteria, ctx).await?;

    let mut pager = Pager::new(args.paging.page_size.unwrap_or(ctx.default_page_size))?;
    pager.set_total(outcome.results.len());
    pager.go_to(args.paging.page);

    let shown = if args.paging.all {
        outcome.results.as_slice()
    } else {
        pager.slice(&outcome.results)
    };

    if ctx.format == OutputFormat::Table && outcome.results.is_empty() {
        output::print_output("Query returned 0 results", ctx.global.quiet);
        return Ok(());
    }

    let out = output::render_list(
        ctx.format,
        shown,
        |r| ResultRow::from(r),
        |r| r.id.clone(),
    )?;
    output::print_output(&out, ctx.global.quiet);

    if ctx.format == OutputFormat::Table {
        output::print_output(&footer(&pager, &outcome, args.paging.all), ctx.global.quiet);
    }
    Ok(())
}

fn footer(pager: &Pager, outcome: &Outcome, all: bool) -> String {
    let mut line = if all {
        format!("SHOWING ALL {}", pager.total())
    } else {
        format!(
            "{}  (page {}/{})",
            pager.label(),
            pager.page(),
            pager.total_pages()
        )
    };
    if outcome.fetched != pager.total() {
        line.push_str(&format!("  filtered from {}", outcome.fetched));
    }
    line.push_str(&format!("  [{}]", outcome.source.label()));
    line
}
