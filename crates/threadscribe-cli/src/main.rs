//! Threadscribe CLI - inspect talk page threads and insert replies.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use threadscribe::html::{self, RcNode};
use threadscribe::modifier;
use threadscribe::prelude::*;
use threadscribe::TranscludedFrom;

#[derive(Parser)]
#[command(name = "threadscribe")]
#[command(author, version, about = "Talk page thread inspector", long_about = None)]
struct Cli {
    /// Locale configuration (JSON); defaults to an English wiki on UTC
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the threads found on a page
    Threads {
        /// Page HTML (use - for stdin)
        input: PathBuf,

        /// Print JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },

    /// Add a reply to a comment and print the modified page body
    Reply {
        /// Page HTML (use - for stdin)
        input: PathBuf,

        /// Id of the comment to reply to
        #[arg(long)]
        id: String,

        /// Reply text
        #[arg(long)]
        text: String,

        /// Treat the reply text as HTML instead of wikitext
        #[arg(long)]
        html: bool,

        /// Output file (omit or use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Threads { input, json } => {
            let body = html::parse_body(&read_input(&input)?);
            let threads = ThreadParser::new(config)?.parse_threads(&body)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&threads_json(&threads))?);
            } else {
                print_outline(&threads);
            }
        }
        Commands::Reply {
            input,
            id,
            text,
            html: as_html,
            output,
        } => {
            let prefix = config.signature_prefix.clone();
            let body = html::parse_body(&read_input(&input)?);
            let threads = ThreadParser::new(config)?.parse_threads(&body)?;
            let comment = threads
                .find_comment_by_id(&id)
                .ok_or_else(|| format!("no comment with id {id}"))?;

            let items = if as_html {
                let reply = html::parse_body(&text);
                modifier::add_html_reply(&threads, comment, &reply, &prefix)?
            } else {
                modifier::add_wikitext_reply(&threads, comment, &text, &prefix)?
            };
            log::info!("reply to {id} added in {} list items", items.len());

            let page = html::serialize_inner(&body);
            match output {
                Some(path) if path.as_os_str() != "-" => fs::write(&path, page)?,
                _ => io::stdout().write_all(page.as_bytes())?,
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LocaleConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::debug!("using config from {}", path.display());
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => {
            log::debug!("using default config");
            Ok(LocaleConfig::default())
        }
    }
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input)
    }
}

fn heading_title(item: &ThreadItem<RcNode>) -> String {
    if item.is_placeholder() {
        "(before first heading)".to_string()
    } else {
        item.range.start_container.text_content().trim().to_string()
    }
}

fn print_outline(threads: &Threads<RcNode>) {
    for &heading in threads.headings() {
        println!("== {} ==", heading_title(threads.item(heading)));
        let mut stack: Vec<ItemId> = threads.item(heading).replies.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let item = threads.item(id);
            let indent = "  ".repeat(item.level);
            println!("{indent}{}", item.id.as_deref().unwrap_or("?"));
            for warning in &item.warnings {
                println!("{indent}  warning: {warning}");
            }
            if let TranscludedFrom::Page(page) = threads.transcluded_from(id) {
                println!("{indent}  from: {page}");
            }
            stack.extend(item.replies.iter().rev().copied());
        }
    }
}

fn threads_json(threads: &Threads<RcNode>) -> serde_json::Value {
    fn item_json(threads: &Threads<RcNode>, id: ItemId) -> serde_json::Value {
        let item = threads.item(id);
        let replies: Vec<_> = item.replies.iter().map(|&r| item_json(threads, r)).collect();
        let warnings: Vec<String> = item.warnings.iter().map(ToString::to_string).collect();
        match item.as_comment() {
            Some(comment) => serde_json::json!({
                "type": "comment",
                "id": item.id,
                "author": comment.author,
                "timestamp": comment.timestamp.to_iso(),
                "level": item.level,
                "warnings": warnings,
                "replies": replies,
            }),
            None => serde_json::json!({
                "type": "heading",
                "title": heading_title(item),
                "placeholder": item.is_placeholder(),
                "authors": threads.authors_below(id),
                "replies": replies,
            }),
        }
    }

    threads
        .headings()
        .iter()
        .map(|&heading| item_json(threads, heading))
        .collect()
}
