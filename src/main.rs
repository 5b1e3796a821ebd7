//! gutlog CLI
//!
//! Command-line front end for the gut health log:
//! - Log in, register, log out
//! - Capture records by hand or with a live timer
//! - Browse and delete past records
//! - View statistics and request AI analysis
//! - Manage settings and generate test data

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use gutlog::models::{
    AnalysisType, Color, Feeling, Period, SettingsUpdate, SmellLevel, StoolType, Symptom,
    TrendMetric,
};
use gutlog::pages::{LoginForm, RegisterForm};
use gutlog::timer::format_clock;
use gutlog::view::{self, OutputFormat};
use gutlog::{
    AnalysisPage, ApiClient, Config, HistoryPage, HomePage, LoginPage, PageContext, PageError,
    RecordPage, RegisterPage, Route, SessionContext, SettingsPage, StatsPage,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "gutlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track bowel movements and review your gut health")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config and GUTLOG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the home page
    Home,

    /// Log in to your account
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,
        /// Password (prompted twice when omitted)
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Record a bowel movement
    Record {
        /// Date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Time of day (HH:MM, default now)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Duration in minutes
        #[arg(short, long)]
        duration: Option<u32>,
        /// Bristol stool type (1-7)
        #[arg(short = 't', long = "type", value_parser = clap::value_parser!(u8).range(1..=7))]
        stool_type: Option<u8>,
        /// Color (brown, dark_brown, light_brown, green, yellow, black, red)
        #[arg(short, long)]
        color: Option<Color>,
        /// Smell level (1-5)
        #[arg(short = 'm', long, value_parser = clap::value_parser!(u8).range(1..=5))]
        smell: Option<u8>,
        /// Feeling (smooth, difficult, painful, urgent, incomplete)
        #[arg(long)]
        feeling: Option<Feeling>,
        /// Symptom tag, repeatable
        #[arg(short, long = "symptom")]
        symptoms: Vec<Symptom>,
        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Time the movement live; press Enter to stop
        #[arg(long)]
        timer: bool,
    },

    /// List past records
    History {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },

    /// Show statistics
    Stats {
        /// Period (week, month, year)
        #[arg(short, long, default_value = "week")]
        period: Period,
        /// Also show the daily frequency trend
        #[arg(long)]
        trends: bool,
    },

    /// Request an AI health analysis
    Analyze {
        /// Analysis type (weekly, monthly)
        #[arg(short = 't', long = "type", default_value = "weekly")]
        analysis_type: AnalysisType,
    },

    /// List past analyses
    Analyses,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Generate test records (developer mode)
    Generate {
        /// Number of daily records (1-30)
        #[arg(short, long, default_value_t = 7)]
        count: u32,
        /// First day (default today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Open a page by path (/, /record, /stats, /analysis, /settings, ...)
    Open {
        path: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Turn developer mode on or off
    DevMode {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Configure the AI provider
    Ai {
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        auto_title: Option<bool>,
    },

    /// Change your password
    Password,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| format!("Invalid time {}: {}. Use HH:MM", s, e))
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Print the error with a login hint when relevant, then exit non-zero
fn exit_with(err: &PageError) -> ! {
    eprintln!("Error: {}", err);
    if err.needs_login() {
        eprintln!("Run `gutlog login --email <email>` to sign in.");
    }
    std::process::exit(1);
}

struct App {
    ctx: PageContext,
    format: OutputFormat,
}

impl App {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load_with_env(path)?,
            None => Config::load_default(),
        };
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }

        if let Err(e) = gutlog::logging::init(&config.logging) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        tracing::debug!(
            base_url = %config.api.base_url,
            session = ?config.session.path,
            "Starting gutlog"
        );

        let session = SessionContext::open_file(&config.session.path)
            .with_context(|| format!("Failed to open session file {:?}", config.session.path))?;
        let client = ApiClient::new(&config.api.base_url, session.clone())?;

        Ok(Self {
            ctx: PageContext::new(Arc::new(client), session),
            format: cli.format,
        })
    }

    fn show(&self, route: Route, body: &str) -> anyhow::Result<()> {
        let user = self.ctx.session.user();
        print!("{}", view::layout(route, user.as_ref(), body)?);
        Ok(())
    }

    fn json_requested(&self) -> bool {
        self.format == OutputFormat::Json
    }

    async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Home => self.home(),
            Commands::Login { email, password } => self.login(email, password).await,
            Commands::Register {
                email,
                password,
                nickname,
            } => self.register(email, password, nickname).await,
            Commands::Logout => {
                let route = HomePage::new(self.ctx.clone()).logout()?;
                eprintln!("Logged out");
                self.open(route.path()).await
            }
            Commands::Record {
                date,
                time,
                duration,
                stool_type,
                color,
                smell,
                feeling,
                symptoms,
                notes,
                timer,
            } => {
                let mut page = RecordPage::new(self.ctx.clone());
                if timer {
                    run_timer(&mut page).await?;
                }

                let form = page.form_mut();
                if let Some(date) = date {
                    form.record_date = date;
                }
                if let Some(time) = time {
                    form.record_time = time;
                }
                if let Some(duration) = duration {
                    form.duration_minutes = duration;
                }
                if let Some(stool_type) = stool_type.and_then(StoolType::new) {
                    form.stool_type = stool_type;
                }
                if let Some(color) = color {
                    form.color = color;
                }
                if let Some(smell) = smell.and_then(SmellLevel::new) {
                    form.smell_level = smell;
                }
                if let Some(feeling) = feeling {
                    form.feeling = feeling;
                }
                for symptom in symptoms {
                    if !form.has_symptom(symptom) {
                        form.toggle_symptom(symptom);
                    }
                }
                if let Some(notes) = notes {
                    form.notes = notes;
                }

                let preview = view::render_record(&page)?;
                match page.submit().await {
                    Ok(created) => {
                        if self.json_requested() {
                            return print_json(&created);
                        }
                        self.show(Route::Record, &preview)?;
                        println!("{} ({})", gutlog::pages::SAVED_MESSAGE, created.record_id);
                        Ok(())
                    }
                    Err(e) => exit_with(&e),
                }
            }
            Commands::History {
                from,
                to,
                page: page_no,
                limit,
            } => {
                let mut page = HistoryPage::new(self.ctx.clone());
                page.set_range(from, to);
                page.set_page(page_no, limit);
                page.load().await;

                match (page.records().loaded(), self.format) {
                    (Some(records), OutputFormat::Json | OutputFormat::Csv) => {
                        let stdout = std::io::stdout().lock();
                        view::write_records(stdout, &records.records, self.format)?;
                        Ok(())
                    }
                    _ => self.show(Route::History, &view::render_history(&page)?),
                }
            }
            Commands::Delete { id } => {
                let mut page = HistoryPage::new(self.ctx.clone());
                match page.delete(&id).await {
                    Ok(()) => {
                        println!("Deleted record {}", id);
                        Ok(())
                    }
                    Err(e) => exit_with(&e),
                }
            }
            Commands::Stats { period, trends } => {
                let mut page = StatsPage::new(self.ctx.clone());
                page.select_period(period).await;
                if trends {
                    page.load_trends(TrendMetric::Frequency).await;
                }

                if self.json_requested() {
                    if let Some(summary) = page.summary().loaded() {
                        return print_json(summary);
                    }
                }

                let mut body = view::render_stats(&page)?;
                if let Some(trends) = page.trends().loaded() {
                    body.push('\n');
                    body.push_str(&view::render_trends(trends)?);
                }
                self.show(Route::Stats, &body)
            }
            Commands::Analyze { analysis_type } => {
                let mut page = AnalysisPage::new(self.ctx.clone());
                page.select_type(analysis_type);
                eprintln!("Analyzing...");
                page.analyze().await;

                if self.json_requested() {
                    if let Some(result) = page.result().loaded() {
                        return print_json(result);
                    }
                }
                self.show(Route::Analysis, &view::render_analysis(&page)?)
            }
            Commands::Analyses => {
                let mut page = AnalysisPage::new(self.ctx.clone());
                page.load_history().await;

                if self.json_requested() {
                    if let Some(history) = page.history().loaded() {
                        return print_json(history);
                    }
                }
                self.show(Route::Analysis, &view::render_analysis_history(page.history())?)
            }
            Commands::Settings { action } => self.settings(action).await,
            Commands::Generate { count, start } => {
                let mut page = SettingsPage::new(self.ctx.clone());
                page.open().await;

                let start = start.unwrap_or_else(|| Local::now().date_naive());
                match page
                    .generate_test_data(count, start, &mut rand::rng())
                    .await
                {
                    Ok(report) => {
                        println!("{}", report.message());
                        Ok(())
                    }
                    Err(e) => exit_with(&e),
                }
            }
            Commands::Open { path } => self.open(&path).await,
            Commands::Config { output } => {
                let content = gutlog::generate_default_config();
                match output {
                    Some(path) => {
                        std::fs::write(&path, content)
                            .with_context(|| format!("Failed to write {:?}", path))?;
                        println!("Config written to {:?}", path);
                    }
                    None => print!("{}", content),
                }
                Ok(())
            }
        }
    }

    fn home(&self) -> anyhow::Result<()> {
        let page = HomePage::new(self.ctx.clone());
        self.show(Route::Home, &view::render_home(&page)?)
    }

    async fn login(&self, email: String, password: Option<String>) -> anyhow::Result<()> {
        let password = match password {
            Some(p) => p,
            None => prompt("Password")?,
        };

        let mut page = LoginPage::new(self.ctx.clone());
        match page.submit(&LoginForm { email, password }).await {
            Ok(user) => {
                println!("Logged in as {}", user.display_name());
                Ok(())
            }
            Err(e) => exit_with(&e),
        }
    }

    async fn register(
        &self,
        email: String,
        password: Option<String>,
        nickname: Option<String>,
    ) -> anyhow::Result<()> {
        let (password, confirm_password) = match password {
            Some(p) => (p.clone(), p),
            None => (prompt("Password")?, prompt("Confirm password")?),
        };

        let form = RegisterForm {
            email,
            password,
            confirm_password,
            nickname: nickname.unwrap_or_default(),
        };
        let mut page = RegisterPage::new(self.ctx.clone());
        match page.submit(&form).await {
            Ok(user) => {
                println!("Welcome, {}! Your account is ready.", user.display_name());
                Ok(())
            }
            Err(e) => exit_with(&e),
        }
    }

    async fn settings(&self, action: Option<SettingsAction>) -> anyhow::Result<()> {
        let mut page = SettingsPage::new(self.ctx.clone());
        page.open().await;

        match action {
            None => {
                if self.json_requested() && page.is_loaded() {
                    return print_json(page.settings());
                }
            }
            Some(SettingsAction::DevMode { state }) => {
                let wanted = match state {
                    Switch::On => true,
                    Switch::Off => false,
                    Switch::Toggle => !page.dev_mode(),
                };
                if wanted != page.dev_mode() {
                    if let Err(e) = page.toggle_dev_mode().await {
                        exit_with(&e);
                    }
                }
            }
            Some(SettingsAction::Ai {
                key,
                url,
                model,
                auto_title,
            }) => {
                let update = SettingsUpdate {
                    dev_mode: None,
                    ai_api_key: key,
                    ai_api_url: url,
                    ai_model: model,
                    ai_auto_title: auto_title,
                };
                if let Err(e) = page.update_ai(update).await {
                    exit_with(&e);
                }
            }
            Some(SettingsAction::Password) => {
                let current = prompt("Current password")?;
                let new = prompt("New password")?;
                let confirm = prompt("Confirm new password")?;
                if let Err(e) = page.change_password(&current, &new, &confirm).await {
                    exit_with(&e);
                }
            }
        }

        self.show(Route::Settings, &view::render_settings(&page)?)
    }

    /// Render whatever page lives at `path`
    async fn open(&self, path: &str) -> anyhow::Result<()> {
        let route = Route::from_path(path);
        let body = match route {
            Route::Home => view::render_home(&HomePage::new(self.ctx.clone()))?,
            Route::Login => view::render_login(&LoginPage::new(self.ctx.clone()))?,
            Route::Register => view::render_register(&RegisterPage::new(self.ctx.clone()))?,
            Route::Record => view::render_record(&RecordPage::new(self.ctx.clone()))?,
            Route::History => {
                let mut page = HistoryPage::new(self.ctx.clone());
                page.load().await;
                view::render_history(&page)?
            }
            Route::Stats => {
                let mut page = StatsPage::new(self.ctx.clone());
                page.open().await;
                view::render_stats(&page)?
            }
            Route::Analysis => {
                let mut page = AnalysisPage::new(self.ctx.clone());
                page.load_history().await;
                let mut body = view::render_analysis(&page)?;
                body.push_str("\nPast analyses\n");
                body.push_str(&view::render_analysis_history(page.history())?);
                body
            }
            Route::Settings => {
                let mut page = SettingsPage::new(self.ctx.clone());
                page.open().await;
                view::render_settings(&page)?
            }
            Route::NotFound => view::render_not_found(path)?,
        };
        self.show(route, &body)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the live timer until Enter is pressed, showing a ticking clock
async fn run_timer(page: &mut RecordPage) -> anyhow::Result<()> {
    page.start_timer();
    eprintln!("Timer started. Press Enter to stop.");

    let mut enter = tokio::spawn(async {
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await
    });
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            read = &mut enter => {
                read??;
                break;
            }
            _ = ticker.tick() => {
                eprint!("\r  {}", format_clock(page.elapsed_secs()));
                std::io::stderr().flush()?;
            }
        }
    }

    let minutes = page.stop_timer();
    eprintln!(
        "\rStopped at {} ({} min)",
        format_clock(page.elapsed_secs()),
        minutes
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = App::new(&cli)?;
    app.run(cli.command.unwrap_or(Commands::Home)).await
}
