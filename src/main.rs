//! Fit_Gy CLI
//!
//! Command-line front end for the Fit_Gy fitness tracker:
//! - Sign up, sign in and out
//! - Log, list, inspect and delete activities
//! - Show and set goals
//! - Browse everything interactively with `fitgy shell`

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use fitgy::config::{generate_default_config, Config};
use fitgy::nav::{Command, HeaderLink, Page};
use fitgy::panels::{
    ActivityChartPanel, ActivityDetailPanel, ActivityListPanel, AddActivityForm, DeleteOutcome,
    GoalEditor, GoalSummaryPanel, HomePage, LoginForm, RegisterForm, DELETE_PROMPT,
};
use fitgy::App;

#[derive(Parser)]
#[command(name = "fitgy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track workouts, monitor progress, and crush your goals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/fitgy/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file and FITGY_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the home page or dashboard
    Home,

    /// Chart of calories burned over time
    Chart,

    /// Manage activities
    Activities {
        #[command(subcommand)]
        command: ActivityCommands,
    },

    /// Manage goals
    Goals {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session
    Shell,
}

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// List all activities
    List,

    /// Show one activity
    Show { id: String },

    /// Log a new activity
    Add {
        /// Activity name, e.g. "Running"
        #[arg(short, long)]
        name: String,
        /// Minutes
        #[arg(short, long)]
        duration: String,
        /// Calories burned
        #[arg(short, long)]
        calories: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an activity
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Show current goals
    Show,

    /// Set goals; omitted values keep their current setting
    Set {
        #[arg(long)]
        daily_calories: Option<String>,
        #[arg(long)]
        weekly_workouts: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    fitgy::logging::init(&config.logging)?;
    tracing::debug!("Fit_Gy CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { output } = &cli.command {
        let template = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &template)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    let app = App::start(config).await?;
    let mut input = Prompt::new();

    let ok = match cli.command {
        Commands::Register { name, email } => register(&app, &mut input, name, email).await?,
        Commands::Login { email } => login(&app, &mut input, email).await?,
        Commands::Logout => match app.logout().await {
            Ok(()) => {
                println!("Logged out.");
                true
            }
            Err(e) => {
                eprintln!("Signed out, but the saved session could not be removed: {}", e);
                false
            }
        },
        Commands::Whoami => match app.user() {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                true
            }
            None => {
                println!("Not logged in.");
                false
            }
        },
        Commands::Home => {
            let mut page = HomePage::mount(app.api());
            page.settle().await;
            print!("{}", page.render().await);
            true
        }
        Commands::Chart => {
            let mut chart = ActivityChartPanel::new();
            chart.load(app.api()).await;
            print!("{}", chart);
            chart.state().error().is_none()
        }
        Commands::Activities { command } => activities(&app, &mut input, command).await?,
        Commands::Goals { command } => goals(&app, command).await?,
        Commands::Shell => {
            shell(&app, &mut input).await?;
            true
        }
        Commands::Config { .. } => true,
    };

    if app.navigator().current() == Page::Login && !app.session().is_authenticated() {
        eprintln!("Your session has expired. Run `fitgy login` to sign in again.");
    }
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Line-based prompts on stdin
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line. `None` at end of input.
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    async fn ask_or(&mut self, label: &str, given: Option<String>) -> anyhow::Result<String> {
        match given {
            Some(value) => Ok(value),
            None => Ok(self.ask(label).await?.unwrap_or_default()),
        }
    }

    async fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{} [y/N] ", prompt)).await?;
        Ok(matches!(
            answer.as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes")
        ))
    }
}

async fn register(
    app: &App,
    input: &mut Prompt,
    name: Option<String>,
    email: Option<String>,
) -> anyhow::Result<bool> {
    let mut form = RegisterForm::new();
    form.name = input.ask_or("Name: ", name).await?;
    form.email = input.ask_or("Email: ", email).await?;
    form.password = input.ask_or("Password: ", None).await?;
    form.confirm_password = input.ask_or("Confirm Password: ", None).await?;

    let ok = form.submit(app.api()).await;
    print!("{}", form);
    Ok(ok)
}

async fn login(app: &App, input: &mut Prompt, email: Option<String>) -> anyhow::Result<bool> {
    let mut form = LoginForm::new();
    form.email = input.ask_or("Email: ", email).await?;
    form.password = input.ask_or("Password: ", None).await?;

    match form.submit(app.api()).await {
        Some(user) => {
            app.on_logged_in();
            println!("Logged in as {}.", user.name);
            Ok(true)
        }
        None => {
            print!("{}", form);
            Ok(false)
        }
    }
}

async fn activities(app: &App, input: &mut Prompt, command: ActivityCommands) -> anyhow::Result<bool> {
    match command {
        ActivityCommands::List => {
            let mut list = ActivityListPanel::new();
            list.load(app.api()).await;
            print!("{}", list);
            Ok(list.state().error().is_none())
        }
        ActivityCommands::Show { id } => {
            let mut detail = ActivityDetailPanel::new(id);
            detail.load(app.api()).await;
            print!("{}", detail);
            Ok(detail.state().ready().is_some())
        }
        ActivityCommands::Add {
            name,
            duration,
            calories,
            date,
        } => {
            let mut form = AddActivityForm::new();
            form.activity_name = name;
            form.duration = duration;
            form.calories_burned = calories;
            if let Some(date) = date {
                form.date = date;
            }
            let created = form.submit(app.api()).await;
            match (&created, form.success()) {
                (Some(activity), Some(message)) => println!("{} [{}]", message, activity.id),
                _ => print!("{}", form),
            }
            Ok(created.is_some())
        }
        ActivityCommands::Delete { id, yes } => {
            let approved = yes || input.confirm(DELETE_PROMPT).await?;
            let mut detail = ActivityDetailPanel::new(id);
            match detail.delete(app.api(), &|_: &str| approved).await {
                DeleteOutcome::Deleted => {
                    app.on_activity_deleted();
                    println!("Activity deleted.");
                    Ok(true)
                }
                DeleteOutcome::Cancelled => {
                    println!("Cancelled.");
                    Ok(true)
                }
                DeleteOutcome::Failed => {
                    eprintln!("Error: {}", detail.error().unwrap_or("Failed to delete activity."));
                    Ok(false)
                }
            }
        }
    }
}

async fn goals(app: &App, command: GoalCommands) -> anyhow::Result<bool> {
    match command {
        GoalCommands::Show => {
            let mut summary = GoalSummaryPanel::new();
            summary.load(app.api()).await;
            print!("{}", summary);
            Ok(summary.state().error().is_none())
        }
        GoalCommands::Set {
            daily_calories,
            weekly_workouts,
        } => {
            let mut editor = GoalEditor::new();
            editor.load(app.api()).await;
            if let Some(value) = daily_calories {
                editor.daily_calories = value;
            }
            if let Some(value) = weekly_workouts {
                editor.weekly_workouts = value;
            }
            let saved = editor.submit(app.api()).await;
            print!("{}", editor);
            Ok(saved.is_some())
        }
    }
}

// ============ Interactive shell ============

enum Flow {
    Continue,
    Quit,
}

const SHELL_HELP: &str = "\
Commands: home, login, register, add, goals, list, view <n>, show <id>,
          delete, logout, help, quit";

async fn shell(app: &App, input: &mut Prompt) -> anyhow::Result<()> {
    let mut pages = app.navigator().subscribe();
    println!("{}", SHELL_HELP);

    loop {
        let page = pages.borrow_and_update().clone();
        print_header(app, &page);

        let flow = match page {
            Page::Home => home_page(app, input).await?,
            Page::Login => login_page(app, input).await?,
            Page::Register => register_page(app, input).await?,
            Page::AddActivity => add_page(app, input).await?,
            Page::SetGoals => goals_page(app, input).await?,
            Page::ActivityDetail { id } => detail_page(app, input, id).await?,
        };
        if let Flow::Quit = flow {
            break;
        }
    }
    Ok(())
}

fn print_header(app: &App, page: &Page) {
    let links: Vec<_> = app.header().iter().map(HeaderLink::label).collect();
    println!();
    println!("== Fit_Gy :: {} ==  [{}]", page.title(), links.join(" | "));
}

/// Commands valid on every page. The command comes back when it is page-specific.
async fn common_command(app: &App, command: Command) -> Result<Flow, Command> {
    match command {
        Command::Quit => Ok(Flow::Quit),
        Command::Help => {
            println!("{}", SHELL_HELP);
            Ok(Flow::Continue)
        }
        Command::List => {
            let mut list = ActivityListPanel::new();
            list.load(app.api()).await;
            print!("{}", list);
            Ok(Flow::Continue)
        }
        command => match app.follow(&command).await {
            Ok(true) => Ok(Flow::Continue),
            Ok(false) => Err(command),
            Err(e) => {
                println!("Signed out, but the saved session could not be removed: {}", e);
                Ok(Flow::Continue)
            }
        },
    }
}

async fn next_command(app: &App, input: &mut Prompt) -> anyhow::Result<Result<Flow, Command>> {
    let line = match input.ask("> ").await? {
        Some(line) => line,
        None => return Ok(Ok(Flow::Quit)),
    };
    Ok(common_command(app, Command::parse(&line)).await)
}

async fn home_page(app: &App, input: &mut Prompt) -> anyhow::Result<Flow> {
    let mut page = HomePage::mount(app.api());
    page.settle().await;
    print!("{}", page.render().await);
    if app.navigator().current() != Page::Home {
        return Ok(Flow::Continue);
    }

    loop {
        let command = match next_command(app, input).await? {
            Ok(flow) => return Ok(flow),
            Err(command) => command,
        };
        let selected = match (&page, command) {
            (HomePage::Dashboard(dashboard), Command::View(position)) => {
                dashboard.select(position).await
            }
            _ => None,
        };
        match selected {
            Some(detail) => {
                app.open(detail);
                return Ok(Flow::Continue);
            }
            None => println!("Unknown command. Type `help` for a list."),
        }
    }
}

async fn login_page(app: &App, input: &mut Prompt) -> anyhow::Result<Flow> {
    if login(app, input, None).await? {
        return Ok(Flow::Continue);
    }
    after_form(app, input, Page::Login).await
}

async fn register_page(app: &App, input: &mut Prompt) -> anyhow::Result<Flow> {
    if register(app, input, None, None).await? {
        app.open(Page::Login);
        return Ok(Flow::Continue);
    }
    after_form(app, input, Page::Register).await
}

async fn add_page(app: &App, input: &mut Prompt) -> anyhow::Result<Flow> {
    let mut form = AddActivityForm::new();
    form.activity_name = input.ask_or("Activity Name: ", None).await?;
    form.duration = input.ask_or("Duration (minutes): ", None).await?;
    form.calories_burned = input.ask_or("Calories Burned: ", None).await?;
    let date = input.ask(&format!("Date [{}]: ", form.date)).await?;
    if let Some(date) = date.filter(|d| !d.trim().is_empty()) {
        form.date = date;
    }

    form.submit(app.api()).await;
    print!("{}", form);
    after_form(app, input, Page::AddActivity).await
}

async fn goals_page(app: &App, input: &mut Prompt) -> anyhow::Result<Flow> {
    let mut editor = GoalEditor::new();
    editor.load(app.api()).await;
    print!("{}", editor);
    if editor.error().is_some() {
        return after_form(app, input, Page::SetGoals).await;
    }

    let daily = input
        .ask(&format!("Daily Calorie Target [{}]: ", editor.daily_calories))
        .await?;
    if let Some(value) = daily.filter(|v| !v.trim().is_empty()) {
        editor.daily_calories = value;
    }
    let weekly = input
        .ask(&format!("Weekly Workout Target [{}]: ", editor.weekly_workouts))
        .await?;
    if let Some(value) = weekly.filter(|v| !v.trim().is_empty()) {
        editor.weekly_workouts = value;
    }

    editor.submit(app.api()).await;
    print!("{}", editor);
    after_form(app, input, Page::SetGoals).await
}

async fn detail_page(app: &App, input: &mut Prompt, id: String) -> anyhow::Result<Flow> {
    let mut detail = ActivityDetailPanel::new(id);
    detail.load(app.api()).await;
    print!("{}", detail);
    if app.navigator().current() == Page::Login {
        return Ok(Flow::Continue);
    }

    loop {
        let command = match next_command(app, input).await? {
            Ok(flow) => return Ok(flow),
            Err(command) => command,
        };
        if !matches!(command, Command::Delete) {
            println!("Unknown command. Type `help` for a list.");
            continue;
        }

        let approved = input.confirm(DELETE_PROMPT).await?;
        match detail.delete(app.api(), &|_: &str| approved).await {
            DeleteOutcome::Deleted => {
                app.on_activity_deleted();
                return Ok(Flow::Continue);
            }
            DeleteOutcome::Cancelled => {}
            DeleteOutcome::Failed => print!("{}", detail),
        }
        if app.navigator().current() != (Page::ActivityDetail { id: detail.id().to_string() }) {
            return Ok(Flow::Continue);
        }
    }
}

/// Wait for a navigation command after a form was handled on `page`
async fn after_form(app: &App, input: &mut Prompt, page: Page) -> anyhow::Result<Flow> {
    if app.navigator().current() != page {
        return Ok(Flow::Continue);
    }
    loop {
        match next_command(app, input).await? {
            Ok(flow) => return Ok(flow),
            Err(_) => println!("Unknown command. Type `help` for a list."),
        }
    }
}
