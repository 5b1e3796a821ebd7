//! Text rendering
//!
//! Every page is drawn inside the same [`layout`]: a title header, the page
//! body and the navigation bar with the active route marked.

mod pages;
mod records;

pub use pages::{
    render_analysis, render_analysis_history, render_history, render_home, render_login,
    render_not_found, render_record, render_register, render_settings, render_stats,
    render_trends,
};
pub use records::{write_records, OutputFormat};

use crate::models::User;
use crate::router::{Route, NAV_ROUTES};
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error")]
    Fmt(#[from] fmt::Error),
}

const RULE_WIDTH: usize = 48;

/// Wrap a rendered page body in the shared header and navigation bar
pub fn layout(route: Route, user: Option<&User>, body: &str) -> Result<String, RenderError> {
    let mut out = String::new();

    let who = user.map(User::display_name).unwrap_or("guest");
    writeln!(out, "{}  ({})", route.title(), who)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", nav_bar(route))?;

    Ok(out)
}

/// `[Home]  Record  Stats  ...` with the active entry bracketed
pub fn nav_bar(active: Route) -> String {
    NAV_ROUTES
        .iter()
        .map(|route| {
            if *route == active {
                format!("[{}]", route.nav_label())
            } else {
                route.nav_label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Horizontal percentage bar, one block per 5%
pub(crate) fn bar(percent: u32) -> String {
    "#".repeat((percent.min(100) / 5) as usize)
}
