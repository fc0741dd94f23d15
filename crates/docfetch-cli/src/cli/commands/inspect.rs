//! `docfetch inspect <url>` – print what the resolver would try, in order.

use anyhow::Result;
use docfetch_core::config::DocfetchConfig;
use docfetch_core::probe::ProbePlan;
use docfetch_core::reference::DocumentRef;
use docfetch_core::resolver::Resolver;
use std::fmt::Write as _;

pub fn run_inspect(cfg: &DocfetchConfig, url: &str) -> Result<()> {
    let (doc, plan) = Resolver::from_config(cfg).plan(url)?;
    print!("{}", render(&doc, &plan));
    Ok(())
}

fn render(doc: &DocumentRef, plan: &ProbePlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "resource type: {}", doc.resource_type);
    let _ = writeln!(out, "delivery type: {}", doc.delivery_type);
    let _ = writeln!(out, "public id:     {}", doc.public_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "direct downloads ({}):", plan.direct.len());
    for (i, candidate) in plan.direct.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, candidate);
    }
    let _ = writeln!(
        out,
        "prefix listings for \"{}\" ({}):",
        plan.search_prefix,
        plan.search.len()
    );
    for (i, (rt, dt)) in plan.search.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. ({}, {})", i + 1, rt, dt);
    }
    out
}
