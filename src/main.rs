mod app;
mod domain;
mod input;
mod ledger;
mod motion;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ledger::StudyLedger;
use persistence::{
    get_data_dir, init_local_dir, registered_user, JsonFileStore, KeyValueStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::io::Write;

#[derive(Parser)]
#[command(name = "swot")]
#[command(about = "A terminal study timer with focus mode, daily stats and todos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .swot directory in the current directory
    Init,
    /// Register the account the ledger is keyed by (prompts for a password)
    Register {
        /// User id
        id: String,
    },
    /// Check the stored credential pair (prompts for the password)
    Login {
        /// User id
        id: String,
    },
    /// Generate a markdown study report
    Report {
        /// Date to generate the report for (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data-dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_dir()?;
            println!("Initialized swot directory: {}", data_dir.display());
            println!();
            println!("swot will now use this local directory for study data.");
            println!("Run 'swot register <id>' once, then 'swot' to start tracking.");
            Ok(())
        }
        Some(Commands::Register { id }) => {
            let mut store = JsonFileStore::open_default()?;
            let password = prompt("Password: ")?;
            let confirmation = prompt("Confirm password: ")?;

            match persistence::register(&mut store, &id, &password, &confirmation)? {
                Ok(()) => {
                    println!("Registered account \"{}\".", id.trim());
                    Ok(())
                }
                Err(e) => anyhow::bail!("{}", e),
            }
        }
        Some(Commands::Login { id }) => {
            let store = JsonFileStore::open_default()?;
            let password = prompt("Password: ")?;

            match persistence::login(&store, &id, &password)? {
                Ok(()) => {
                    println!("Welcome back, {}.", id);
                    Ok(())
                }
                Err(e) => anyhow::bail!("{}", e),
            }
        }
        Some(Commands::Report { date, output }) => {
            let report_date = if let Some(date_str) = date {
                chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?
            } else {
                chrono::Local::now().date_naive()
            };

            let output_path = output.map(std::path::PathBuf::from);

            println!("Generating report for {}...", report_date);
            let report_path = report::generate_report(Some(report_date), output_path)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        None => {
            // Run the normal TUI application
            run_tui()
        }
    }
}

/// Read one line from stdin with a prompt
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

fn run_tui() -> Result<()> {
    // Show which directory we're using
    let data_dir = get_data_dir()?;
    eprintln!("Using swot directory: {}", data_dir.display());

    let store = JsonFileStore::open_default()?;
    let Some(user_id) = registered_user(&store)? else {
        eprintln!("No account registered yet. Run 'swot register <id>' first.");
        return Ok(());
    };

    // Load the dated ledger and the timer/todo snapshots
    let studies = StudyLedger::load(store)?;
    let mut app = AppState::new(user_id, studies)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;

    // Stop the running timer on exit (no background accrual)
    app.session.stop();

    // Save on exit
    if let Err(e) = app.save() {
        eprintln!("Error saving state: {}", e);
    }

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let poll_rate = ticker::poll_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process key press events (ignore key release)
                    if key.kind == KeyEventKind::Press {
                        let should_quit = input::handle_key(app, key)?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
                // Terminal focus loss is the desktop rendition of the app
                // going to background: interrupts a Focus-mode session
                Event::FocusLost => {
                    app.focus_lost();
                }
                _ => {}
            }
        }

        // Credit elapsed whole seconds to the running subject
        app.tick()?;

        // Autosave if needed
        if app.needs_save {
            app.save()?;
        }
        if app.todos_need_save {
            app.save_todos()?;
        }
    }
}
