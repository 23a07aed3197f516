//! parley — terminal chat client for a parley relay.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parley_session::{Attachment, RelayTransport, Session, WordReveal, reveal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Terminal chat client for a parley relay
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay endpoint to talk to
    #[arg(short, long, default_value = "http://localhost:3000/api/gemini")]
    endpoint: String,

    /// Milliseconds between revealed words
    #[arg(long, default_value_t = 35)]
    reveal_ms: u64,

    /// Print replies in full instead of revealing word by word
    #[arg(long)]
    plain: bool,

    /// Send a single message, print the reply, and exit
    #[arg(short, long)]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configure_logging();
    let args = Args::parse();

    let transport = Arc::new(RelayTransport::new(args.endpoint.clone()));
    let mut session = Session::new(transport);

    if let Some(prompt) = args.prompt.clone() {
        if let Some(reply) = session.submit(&prompt).await? {
            render_reply(&reply, &args).await;
        }
        return Ok(());
    }

    println!("parley — chatting via {}", args.endpoint);
    println!("Commands: /clear, /attach <path>, /detach, /quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            "/detach" => match session.detach() {
                Some(attachment) => println!("Detached {} attachment.", attachment.mime_type),
                None => println!("Nothing attached."),
            },
            _ if line.starts_with("/attach") => {
                let path = line.trim_start_matches("/attach").trim();
                if path.is_empty() {
                    println!("Usage: /attach <path>");
                    continue;
                }
                match Attachment::from_path(path) {
                    Ok(attachment) => {
                        println!("Attached {path} ({}).", attachment.mime_type);
                        session.attach(attachment);
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            _ => {
                println!("Thinking...");
                match session.submit(line).await {
                    Ok(Some(reply)) => render_reply(&reply, &args).await,
                    Ok(None) => {}
                    Err(err) => println!("Error: {err}"),
                }
            }
        }
    }

    Ok(())
}

/// Play the reply word by word; Ctrl-C skips to the full text.
async fn render_reply(reply: &str, args: &Args) {
    if args.plain || args.reveal_ms == 0 {
        println!("{reply}");
        return;
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let ctrlc = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let mut printed = 0;
    reveal::play(
        WordReveal::new(reply),
        Duration::from_millis(args.reveal_ms),
        &cancel,
        |frame| {
            print!("{}", &frame[printed..]);
            let _ = std::io::stdout().flush();
            printed = frame.len();
        },
    )
    .await;
    ctrlc.abort();

    if printed < reply.len() {
        print!("{}", &reply[printed..]);
    }
    println!();
}

fn configure_logging() {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}
