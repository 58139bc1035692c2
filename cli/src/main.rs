mod session;
mod terminal;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use widget::{
    ChatWidget, ContactForm, ContactWidget, FileStore, HttpProxyClient, Lang, Messages, ProxyError, RateLimitConfig,
    RateLimiter, StoreError, WidgetError,
};

use crate::session::SessionDir;
use crate::terminal::TerminalView;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown language `{0}` (expected en or km)")]
    InvalidLang(String),
    #[error("session store failed: {0}")]
    Store(#[from] StoreError),
    #[error("proxy setup failed: {0}")]
    Proxy(#[from] ProxyError),
    #[error("{0}")]
    Widget(#[from] WidgetError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed with HTTP {0}")]
    Unhealthy(u16),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "portfolio-cli", about = "Terminal front end for the portfolio chat and contact proxies")]
struct Cli {
    #[arg(long, env = "PORTFOLIO_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Directory holding the chat session. Without it, history lives in a
    /// temp directory removed when the command exits.
    #[arg(long, env = "PORTFOLIO_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    #[arg(long, env = "PORTFOLIO_LANG", default_value = "en")]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Chat with the site assistant. Without `--message`, starts a REPL.
    Chat(ChatArgs),
    /// Send a contact form submission.
    Contact(ContactArgs),
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[arg(long)]
    message: Option<String>,
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    message: String,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    session_dir: Option<PathBuf>,
    messages: Messages,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let lang = Lang::parse(&cli.lang).ok_or_else(|| CliError::InvalidLang(cli.lang.clone()))?;
    let ctx = CliContext {
        base_url: cli.base_url,
        session_dir: cli.session_dir,
        messages: Messages::new(lang),
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Chat(args) => run_chat(&ctx, args).await,
        Command::Contact(args) => run_contact(&ctx, args).await,
    }
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let url = format!("{}/healthz", ctx.base_url.trim_end_matches('/'));
    let status = reqwest::Client::new().get(url).send().await?.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_chat(ctx: &CliContext, args: ChatArgs) -> Result<(), CliError> {
    let session = SessionDir::resolve(ctx.session_dir.clone())?;
    let store = FileStore::open(session.path())?;
    tracing::debug!(dir = %session.path().display(), "chat session store opened");
    let proxy = Arc::new(HttpProxyClient::new(&ctx.base_url)?);
    let limiter = RateLimiter::new(RateLimitConfig::chat_from_env());
    let mut chat = ChatWidget::new(store, proxy, limiter, ctx.messages);
    let mut view = TerminalView::new(io::stdout(), ctx.messages);

    if let Some(message) = args.message {
        chat.on_send_chat(&message, &mut view).await?;
        return Ok(());
    }

    chat.on_open(&mut view);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if view.input_enabled() {
            view.prompt();
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/reset" => chat.on_reset(&mut view),
            text => {
                // Failures are already rendered by the view.
                let _ = chat.on_send_chat(text, &mut view).await;
            }
        }
    }
    Ok(())
}

async fn run_contact(ctx: &CliContext, args: ContactArgs) -> Result<(), CliError> {
    let proxy = Arc::new(HttpProxyClient::new(&ctx.base_url)?);
    let limiter = RateLimiter::new(RateLimitConfig::form_from_env());
    let mut contact = ContactWidget::new(proxy, limiter, ctx.messages);
    let mut view = TerminalView::new(io::stdout(), ctx.messages);

    let form = ContactForm {
        name: args.name,
        email: args.email,
        phonenumber: args.phone,
        message: args.message,
        captcha_token: None,
    };
    contact.on_submit_form(&form, &mut view).await?;
    Ok(())
}
