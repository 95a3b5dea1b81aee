// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate route` command implementation.

use std::io::IsTerminal;

use clap::Args;
use serde::Serialize;
use tiergate_config::TiergateConfig;
use tiergate_core::{Backend, QueryContext, RoutingDecision, TiergateError};
use tiergate_router::Router;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Natural-language question.
    #[arg(long)]
    pub question: String,

    /// Data-source identifier the question targets.
    #[arg(long)]
    pub source: String,

    /// public, internal, confidential or restricted.
    #[arg(long)]
    pub sensitivity: String,

    /// simple, moderate or complex.
    #[arg(long)]
    pub complexity: String,

    /// The answer needs iterative refinement against query results.
    #[arg(long)]
    pub iterate: bool,

    /// Estimated token count (0 = unknown).
    #[arg(long, default_value_t = 0)]
    pub tokens: u32,

    /// Preferred backend.
    #[arg(long)]
    pub prefer: Option<String>,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Disable colors.
    #[arg(long)]
    pub plain: bool,
}

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
struct RouteResponse<'a> {
    question: &'a str,
    data_source: &'a str,
    #[serde(flatten)]
    decision: &'a RoutingDecision,
}

/// Build the query context described by `args`.
pub fn context_from_args(args: &RouteArgs) -> Result<QueryContext, TiergateError> {
    let mut context = QueryContext::parse(
        &args.question,
        &args.source,
        &args.sensitivity,
        &args.complexity,
        args.iterate,
    )?
    .with_estimated_tokens(args.tokens);
    if let Some(name) = &args.prefer {
        context = context.with_preference(Backend::parse(name)?);
    }
    Ok(context)
}

/// Run the `tiergate route` command.
pub fn run_route(config: &TiergateConfig, args: &RouteArgs) -> Result<(), TiergateError> {
    let context = context_from_args(args)?;
    let router = Router::from_config(config)?;
    let decision = router.route(&context);

    if args.json {
        let response = RouteResponse {
            question: &context.question,
            data_source: &context.data_source,
            decision: &decision,
        };
        let rendered = serde_json::to_string_pretty(&response)
            .map_err(|e| TiergateError::Internal(format!("failed to render decision: {e}")))?;
        println!("{rendered}");
    } else {
        let use_color = !args.plain && std::io::stdout().is_terminal();
        print_decision(&decision, use_color);
    }
    Ok(())
}

fn print_decision(decision: &RoutingDecision, use_color: bool) {
    println!();
    println!("  tiergate route");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!("    Backend:  {}", decision.backend.to_string().green().bold());
        println!("    Exposure: {}", decision.exposure.to_string().cyan());
    } else {
        println!("    Backend:  {}", decision.backend);
        println!("    Exposure: {}", decision.exposure);
    }
    println!("    Cost:     ${:.6}", decision.estimated_cost);
    println!("    Reason:   {}", decision.reason);
    println!();
}
