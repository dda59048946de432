//! `mindcare chat`: interactive or single-message chat in the terminal.
//!
//! The terminal session owns the transcript and hands the whole of it to the
//! app on every turn.

use mindcare_agent::{ChatReply, MindcareApp, assemble_messages, persona};
use mindcare_config::AppConfig;
use mindcare_core::message::Turn;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, app) = super::load_app()?;

    if dry_run {
        print_dry_run(&config, message.as_deref().unwrap_or(""));
        return Ok(());
    }

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let reply = app.reply(&msg, &[]).await;
        eprint!("\r              \r");
        println!("{}", reply.text);
        print_sources(&reply);
        return Ok(());
    }

    interactive(&app).await
}

fn print_dry_run(config: &AppConfig, message: &str) {
    let persona = persona::resolve(config.persona.system_prompt_override.as_deref());
    for (i, m) in assemble_messages(&persona, message, &[]).iter().enumerate() {
        println!("[{i}] {}:", m.role);
        for line in m.content.lines() {
            println!("    {line}");
        }
    }
}

async fn interactive(app: &MindcareApp) -> Result<(), Box<dyn std::error::Error>> {
    let status = app.status();

    println!();
    println!("  {}", persona::APP_TITLE);
    println!("  {}", persona::TAGLINE);
    println!();
    match (&status.provider, &status.model) {
        (Some(provider), Some(model)) => {
            println!("  Provider:  {provider}");
            println!("  Model:     {model}");
        }
        _ => println!("  Status:    not configured, run `mindcare doctor`"),
    }
    println!();
    println!("  {}", persona::CHAT_DESCRIPTION);
    println!("  Commands: /mood <label> [note], /history, /help, /clear, exit");
    println!();

    let mut transcript: Vec<Turn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input {
            "exit" | "quit" => break,
            "/help" => print!("{}", mindcare_agent::resources::crisis_markdown()),
            "/history" => println!("{}", app.mood_history()),
            "/clear" => {
                transcript.clear();
                println!("  (conversation cleared)");
            }
            _ if input.starts_with("/mood") => {
                let rest = input.trim_start_matches("/mood").trim();
                let (mood, note) = rest.split_once(' ').unwrap_or((rest, ""));
                let label = mood
                    .parse::<mindcare_agent::MoodLabel>()
                    .map(|m| m.display())
                    .unwrap_or_else(|_| mood.to_string());
                println!("{}", app.log_mood(&label, note.trim()));
            }
            _ => {
                eprint!("  ...");
                let reply = app.reply(input, &transcript).await;
                eprint!("\r     \r");
                println!();
                for line in reply.text.lines() {
                    println!("  MindcareAI > {line}");
                }
                print_sources(&reply);
                transcript.push(Turn::exchange(input, reply.text));
            }
        }

        println!();
        prompt()?;
    }

    println!();
    println!("  Take care. 🌿");
    println!();

    Ok(())
}

fn print_sources(reply: &ChatReply) {
    if reply.sources.is_empty() {
        return;
    }
    println!("  Sources:");
    for (i, source) in reply.sources.iter().enumerate() {
        println!("    [{}] {} <{}>", i + 1, source.title, source.uri);
    }
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
