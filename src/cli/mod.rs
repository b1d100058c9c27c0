use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use log::debug;

use crate::classifier::{classify, ContentSample};
use crate::pager::{write_plain, PagerProcess};
use crate::render::{
    default_width, Dispatcher, MarkdownConverter, RenderRequest, SyntectHighlighter,
};

#[derive(Parser, Debug)]
#[command(name = "mdview")]
#[command(version, about = "Render Markdown and highlight code for terminal paging", long_about = None)]
pub struct Args {
    /// File to display (use "-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Force Markdown rendering even for non-.md files
    #[arg(long = "md", visible_alias = "markdown")]
    pub force_markdown: bool,

    /// Render width override (default: terminal width for Markdown,
    /// longest line plus one for code, floor 80)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Syntax highlighting theme
    #[arg(long, env = "MDVIEW_THEME", default_value = crate::render::highlight::DEFAULT_THEME)]
    pub theme: String,

    /// Write to stdout instead of spawning the pager
    #[arg(long)]
    pub no_pager: bool,

    /// Emit color escapes even when stdout is not a terminal
    #[arg(long)]
    pub force_color: bool,
}

struct Input {
    content: String,
    path: Option<PathBuf>,
    display_name: Option<String>,
}

pub fn run(args: Args) -> Result<i32> {
    let input = read_input(&args)?;

    let sample = ContentSample::new(&input.content, input.path.as_deref());
    let verdict = classify(&sample, args.force_markdown);
    debug!(
        "classified {} as {:?}",
        input.display_name.as_deref().unwrap_or("<stdin>"),
        verdict
    );

    // The pager reads pre-formatted text over a pipe, so tty
    // auto-detection would strip the colors it is meant to display.
    if args.force_color || (!args.no_pager && io::stdout().is_tty()) {
        colored::control::set_override(true);
    }

    let width = args
        .width
        .filter(|w| *w > 0)
        .unwrap_or_else(|| default_width(&input.content, &verdict));
    let request = RenderRequest::new(input.content, verdict, width);

    let dispatcher = Dispatcher::new(
        MarkdownConverter::new(),
        SyntectHighlighter::new(args.theme.as_str()),
    );
    let output = dispatcher.render(&request);

    if args.no_pager {
        write_plain(&output.text)
    } else {
        PagerProcess::default().page(&output.text, input.display_name.as_deref())
    }
}

fn read_input(args: &Args) -> Result<Input> {
    if args.file == "-" || args.file == "/dev/stdin" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read from stdin")?;
        return Ok(Input {
            content,
            path: None,
            display_name: None,
        });
    }

    let path = PathBuf::from(&args.file);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Input {
        content,
        display_name: Some(args.file.clone()),
        path: Some(path),
    })
}
