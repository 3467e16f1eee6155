use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use zip_manager::app::{KeyInput, Session};
use zip_manager::core::actions::{generate_help_entries, Action};
use zip_manager::models::ListItem;
use zip_manager::system::TerminalHost;
use zip_manager::utils::config::Config;
use zip_manager::utils::error::Result;
use zip_manager::utils::formatter::{format_file_size, format_progress, pluralize, progress_bar};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load(Config::default_path().as_deref())?;
    let host = TerminalHost::new(TerminalHost::default_download_dir());
    tracing::info!(download_dir = %host.download_dir().display(), "session started");
    let mut session = Session::new(config, Box::new(host));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let res = run_session(&mut session).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    if session.downloads().in_flight() > 0 {
        println!(
            "Waiting for {}...",
            pluralize(session.downloads().in_flight(), "download", "downloads")
        );
        session.settle().await;
    }

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// 로그는 파일로 기록 (화면 위에 찍히지 않도록)
///
/// 로그 파일을 열 수 없으면 RUST_LOG를 지정한 경우에만 stderr로 기록합니다.
fn init_logging() {
    let log_file = Config::log_path().and_then(|path| Config::open_log_file(&path).ok());
    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("zip_manager=info")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
            )
            .with_writer(io::stderr)
            .init(),
    }
}

async fn run_session(session: &mut Session) -> Result<()> {
    let mut stdout = io::stdout();
    render(&mut stdout, session)?;

    loop {
        let mut dirty = session.pump() > 0;

        if tokio::task::block_in_place(|| event::poll(POLL_INTERVAL))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(session, key.modifiers, key.code).await;
                    dirty = true;
                }
            }
        }

        if session.should_quit() {
            return Ok(());
        }
        if dirty || !session.downloads().downloads().is_empty() {
            render(&mut stdout, session)?;
        }
    }
}

/// 키 입력 처리 (버튼 역할의 기능키 포함)
async fn handle_key(session: &mut Session, modifiers: KeyModifiers, code: KeyCode) {
    let button = match code {
        KeyCode::F(8) => Some(Action::ResetClipboard),
        KeyCode::F(9) => Some(Action::Reset),
        _ => None,
    };
    if let Some(action) = button {
        if session.action_states().is_enabled(action) {
            session.execute_action(action).await;
        }
        return;
    }

    // Ctrl+K: 가장 최근 다운로드 취소
    if code == KeyCode::Char('k') && modifiers == KeyModifiers::CONTROL {
        if let Some(id) = session.downloads().downloads().first().map(|d| d.id) {
            session.abort_download(id);
        }
        return;
    }

    // Space는 하이라이트된 항목의 이름 칸에서 눌린 것으로 취급
    let mut input = KeyInput::new(modifiers, code);
    if code == KeyCode::Char(' ') {
        if let Some(item) = session.highlighted() {
            input = input.on_entry_name(item);
        }
    }
    session.dispatch(input).await;
}

fn render(stdout: &mut impl Write, session: &Session) -> Result<()> {
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    let fs = session.fs();
    write!(stdout, "zip-manager  {}\r\n\r\n", session.breadcrumb_label())?;

    let highlighted = session.highlighted();
    for item in session.entries() {
        let marker = if Some(*item) == highlighted { ">" } else { " " };
        let line = match item {
            ListItem::Parent(_) => "[..]".to_string(),
            ListItem::Entry(id) if fs.is_directory(*id) => {
                format!("[D] {}/", fs.name(*id).unwrap_or_default())
            }
            ListItem::Entry(id) => format!(
                "[F] {}  {}",
                fs.name(*id).unwrap_or_default(),
                format_file_size(fs.file_size(*id).unwrap_or(0))
            ),
        };
        write!(stdout, "{} {}\r\n", marker, line)?;
    }
    if session.entries().is_empty() {
        write!(stdout, "  (empty)\r\n")?;
    }

    let clipboard = match session.clipboard().content() {
        Some(content) => format!(
            "{} {}",
            if content.cut { "cut" } else { "copy" },
            fs.name(content.entry).unwrap_or_default()
        ),
        None => "empty".to_string(),
    };
    write!(stdout, "\r\nclipboard: {}\r\n", clipboard)?;

    let downloads = session.downloads().downloads();
    if !downloads.is_empty() {
        write!(stdout, "downloads:\r\n")?;
        for download in downloads {
            write!(
                stdout,
                "  #{} {} {} {}\r\n",
                download.id,
                progress_bar(download.percentage(), 20),
                format_progress(download.percentage()),
                download.name
            )?;
        }
    }

    write!(stdout, "\r\n")?;
    for (category, items) in generate_help_entries() {
        let keys: Vec<String> = items
            .iter()
            .map(|(key, label)| format!("{} {}", key, label))
            .collect();
        write!(stdout, "{:<8} {}\r\n", category, keys.join(" | "))?;
    }
    write!(
        stdout,
        "{:<8} F8 Reset clipboard | F9 Reset | Ctrl+K Abort download | Space Toggle\r\n",
        "Buttons"
    )?;
    stdout.flush()?;
    Ok(())
}
