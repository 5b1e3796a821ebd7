//! Per-page bodies

use super::records::{write_records, OutputFormat};
use super::{bar, RenderError};
use crate::models::{redact, source_label, AnalysisResult, AnalysisSummary, StatsSummary, Trends};
use crate::pages::{
    health_label, stool_type_percentages, AnalysisPage, HistoryPage, HomePage, LoadState,
    LoginPage, Notice, PageError, RecordPage, RegisterPage, SettingsPage, StatsPage, StatsView,
    DISCLAIMER,
};
use crate::router::Route;
use crate::timer::format_clock;
use std::fmt::Write;

fn notice(out: &mut String, notice: Option<&Notice>) -> std::fmt::Result {
    match notice {
        Some(Notice::Success(m)) => writeln!(out, "OK: {}\n", m),
        Some(Notice::Error(m)) => writeln!(out, "Error: {}\n", m),
        None => Ok(()),
    }
}

fn login_prompt(out: &mut String, err: &PageError) -> std::fmt::Result {
    writeln!(out, "{}", err)?;
    writeln!(out, "Run `gutlog login` to sign in.")
}

fn failure(out: &mut String, err: &PageError) -> std::fmt::Result {
    if err.needs_login() {
        login_prompt(out, err)
    } else {
        writeln!(out, "Error: {}", err)
    }
}

pub fn render_home(page: &HomePage) -> Result<String, RenderError> {
    let mut out = String::new();

    match page.user() {
        Some(user) => writeln!(out, "Welcome back, {}!", user.display_name())?,
        None => {
            writeln!(out, "Keep a simple log of your bowel movements and")?;
            writeln!(out, "let the trends tell you how your gut is doing.")?;
        }
    }

    writeln!(out)?;
    for route in page.shortcuts() {
        match route.command() {
            Some(cmd) => writeln!(out, "  {:<16} gutlog {}", route.title(), cmd)?,
            None => writeln!(out, "  {}", route.title())?,
        }
    }
    if page.is_logged_in() {
        writeln!(out, "\n  {:<16} gutlog logout", "Log out")?;
    }

    Ok(out)
}

fn auth_body(out: &mut String, error: Option<&str>, hint: &str) -> std::fmt::Result {
    if let Some(error) = error {
        writeln!(out, "Error: {}\n", error)?;
    }
    writeln!(out, "{}", hint)
}

pub fn render_login(page: &LoginPage) -> Result<String, RenderError> {
    let mut out = String::new();
    auth_body(
        &mut out,
        page.error(),
        "Sign in with `gutlog login --email <email>`.\nNo account yet? Use `gutlog register`.",
    )?;
    Ok(out)
}

pub fn render_register(page: &RegisterPage) -> Result<String, RenderError> {
    let mut out = String::new();
    auth_body(
        &mut out,
        page.error(),
        "Create an account with `gutlog register --email <email> [--nickname <name>]`.\n\
         Passwords need at least 6 characters.",
    )?;
    Ok(out)
}

pub fn render_record(page: &RecordPage) -> Result<String, RenderError> {
    let mut out = String::new();
    notice(&mut out, page.notice())?;

    if page.is_timer_running() {
        writeln!(out, "Timer running: {}\n", format_clock(page.elapsed_secs()))?;
    }

    let form = page.form();
    let duration = if form.duration_minutes > 0 {
        format!("{} min", form.duration_minutes)
    } else {
        "-".to_string()
    };
    let symptoms = if form.symptoms.is_empty() {
        "none".to_string()
    } else {
        form.symptoms
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    writeln!(out, "Date:        {}", form.record_date.format("%Y-%m-%d"))?;
    writeln!(out, "Time:        {}", form.record_time.format("%H:%M"))?;
    writeln!(out, "Duration:    {}", duration)?;
    writeln!(
        out,
        "Stool type:  {} - {} ({})",
        form.stool_type,
        form.stool_type.description(),
        form.stool_type.status()
    )?;
    writeln!(out, "Color:       {}", form.color.label())?;
    writeln!(
        out,
        "Smell:       {} - {}",
        form.smell_level.level(),
        form.smell_level.label()
    )?;
    writeln!(out, "Feeling:     {}", form.feeling.label())?;
    writeln!(out, "Symptoms:    {}", symptoms)?;
    if !form.notes.is_empty() {
        writeln!(out, "Notes:       {}", form.notes)?;
    }

    Ok(out)
}

fn period_selector(out: &mut String, page: &StatsPage) -> std::fmt::Result {
    let periods: Vec<String> = crate::models::Period::ALL
        .iter()
        .map(|p| {
            if *p == page.period() {
                format!("[{}]", p.label())
            } else {
                p.label().to_string()
            }
        })
        .collect();
    writeln!(out, "{}\n", periods.join("  "))
}

fn summary_body(out: &mut String, summary: &StatsSummary) -> std::fmt::Result {
    writeln!(
        out,
        "Health score:   {:.0} / 100 ({})",
        summary.health_score,
        health_label(summary.health_score)
    )?;
    writeln!(out, "Records:        {}", summary.total_records)?;
    writeln!(out, "Per day:        {:.1}", summary.avg_frequency_per_day)?;
    writeln!(out, "Avg duration:   {:.1} min", summary.avg_duration_minutes)?;
    if let (Some(recorded), Some(days)) = (summary.recorded_days, summary.days) {
        write!(out, "Days recorded:  {}/{}", recorded, days)?;
        if let Some(rate) = summary.coverage_rate {
            write!(out, " ({:.0}%)", rate * 100.0)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "\nStool types")?;
    for entry in stool_type_percentages(&summary.stool_type_distribution) {
        writeln!(
            out,
            "  {} {:<16} {:<20} {:>3}% ({})",
            entry.stool_type,
            entry.stool_type.description(),
            bar(entry.percent),
            entry.percent,
            entry.count
        )?;
    }

    let time = summary.time_distribution;
    writeln!(out, "\nTime of day")?;
    writeln!(out, "  Morning:   {}", time.morning)?;
    writeln!(out, "  Afternoon: {}", time.afternoon)?;
    writeln!(out, "  Evening:   {}", time.evening)
}

pub fn render_stats(page: &StatsPage) -> Result<String, RenderError> {
    let mut out = String::new();
    period_selector(&mut out, page)?;

    match page.view() {
        StatsView::Idle | StatsView::Loading => writeln!(out, "Loading...")?,
        StatsView::LoginRequired(e) => login_prompt(&mut out, e)?,
        StatsView::Failed(e) => writeln!(out, "Error: {}", e)?,
        StatsView::Empty => {
            writeln!(out, "No records for this period yet.")?;
            writeln!(
                out,
                "Start tracking on the {} page: gutlog record",
                Route::Record.nav_label()
            )?;
        }
        StatsView::Ready(summary) => summary_body(&mut out, summary)?,
    }

    Ok(out)
}

pub fn render_trends(trends: &Trends) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "Daily {}", trends.metric)?;

    let max = trends
        .trends
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);
    for point in &trends.trends {
        if !point.is_recorded {
            writeln!(out, "  {}  -", point.date)?;
            continue;
        }
        let percent = if max > 0.0 {
            (point.value / max * 100.0).round() as u32
        } else {
            0
        };
        writeln!(out, "  {}  {:<20} {:.1}", point.date, bar(percent), point.value)?;
    }

    Ok(out)
}

fn analysis_body(out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
    writeln!(
        out,
        "Health score: {:.0} / 100 ({})",
        result.health_score,
        health_label(result.health_score)
    )?;
    writeln!(out, "Source:       {}", source_label(result.analysis_source.as_deref()))?;

    if !result.warnings.is_empty() {
        writeln!(out, "\nWarnings")?;
        for warning in &result.warnings {
            writeln!(out, "  ! {}", warning.message)?;
        }
    }
    if !result.insights.is_empty() {
        writeln!(out, "\nInsights")?;
        for insight in &result.insights {
            writeln!(out, "  * {}: {}", insight.title, insight.description)?;
        }
    }
    if !result.suggestions.is_empty() {
        writeln!(out, "\nSuggestions")?;
        for suggestion in &result.suggestions {
            writeln!(out, "  - [{}] {}", suggestion.category, suggestion.suggestion)?;
        }
    }
    Ok(())
}

pub fn render_analysis(page: &AnalysisPage) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "{}\n", page.analysis_type().label())?;

    match page.result() {
        LoadState::Idle => writeln!(out, "Run `gutlog analyze` to generate a report.")?,
        LoadState::Loading => writeln!(out, "Analyzing...")?,
        LoadState::Failed(e) => failure(&mut out, e)?,
        LoadState::Loaded(result) if result.is_empty() => {
            writeln!(out, "Nothing to report for this period.")?
        }
        LoadState::Loaded(result) => analysis_body(&mut out, result)?,
    }

    if page.shows_disclaimer() {
        writeln!(out, "\n{}", DISCLAIMER)?;
    }

    Ok(out)
}

pub fn render_analysis_history(
    history: &LoadState<Vec<AnalysisSummary>>,
) -> Result<String, RenderError> {
    let mut out = String::new();

    match history {
        LoadState::Idle | LoadState::Loading => writeln!(out, "Loading...")?,
        LoadState::Failed(e) => failure(&mut out, e)?,
        LoadState::Loaded(analyses) if analyses.is_empty() => {
            writeln!(out, "No analyses yet.")?
        }
        LoadState::Loaded(analyses) => {
            writeln!(
                out,
                "{:<10} | {:<10} | {:<10} | {:>5} | {}",
                "Type", "From", "To", "Score", "Created"
            )?;
            writeln!(out, "{}", "-".repeat(64))?;
            for analysis in analyses {
                writeln!(
                    out,
                    "{:<10} | {:<10} | {:<10} | {:>5.0} | {}",
                    analysis.analysis_type,
                    analysis.period_start.as_deref().unwrap_or("-"),
                    analysis.period_end.as_deref().unwrap_or("-"),
                    analysis.health_score,
                    analysis.created_at.as_deref().unwrap_or("-"),
                )?;
            }
        }
    }

    Ok(out)
}

pub fn render_settings(page: &SettingsPage) -> Result<String, RenderError> {
    let mut out = String::new();
    notice(&mut out, page.notice())?;

    if !page.is_logged_in() {
        writeln!(out, "Log in to manage your settings: gutlog login")?;
        return Ok(out);
    }

    let settings = page.settings();
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    writeln!(out, "Developer mode:  {}", on_off(settings.dev_mode))?;
    writeln!(out, "\nAI provider")?;
    writeln!(
        out,
        "  API key:       {}",
        settings
            .ai_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(redact)
            .unwrap_or_else(|| "not set".to_string())
    )?;
    writeln!(
        out,
        "  API URL:       {}",
        settings.ai_api_url.as_deref().unwrap_or("default")
    )?;
    writeln!(
        out,
        "  Model:         {}",
        settings.ai_model.as_deref().unwrap_or("default")
    )?;
    writeln!(out, "  Auto title:    {}", on_off(settings.ai_auto_title))?;

    if settings.dev_mode {
        writeln!(out, "\nTest data: gutlog generate --count <1-30> --start <YYYY-MM-DD>")?;
    }

    Ok(out)
}

pub fn render_history(page: &HistoryPage) -> Result<String, RenderError> {
    let mut out = String::new();
    notice(&mut out, page.notice())?;

    let query = page.query();
    if query.start_date.is_some() || query.end_date.is_some() {
        let fmt = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "...".to_string())
        };
        writeln!(out, "Range: {} to {}", fmt(query.start_date), fmt(query.end_date))?;
    }

    match page.records() {
        LoadState::Idle | LoadState::Loading => writeln!(out, "Loading...")?,
        LoadState::Failed(e) => failure(&mut out, e)?,
        LoadState::Loaded(records) => {
            let mut table = Vec::new();
            write_records(&mut table, &records.records, OutputFormat::Table)?;
            out.push_str(&String::from_utf8_lossy(&table));
            writeln!(out, "\nPage {} ({} per page)", query.page, query.limit)?;
        }
    }

    Ok(out)
}

pub fn render_not_found(path: &str) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "Nothing lives at {}.", path)?;
    writeln!(out, "Try one of: /, /record, /stats, /analysis, /settings, /history")?;
    Ok(out)
}
