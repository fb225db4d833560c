use clap::Parser;
use nyacore_splits::{RenderView, Renderer, SplitTimer};
use std::error::Error;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

/// split timer with per-split best and average records
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// splits config file (TOML)
    #[clap(default_value = "splits.toml")]
    config: PathBuf,

    /// read commands from stdin even if general.use_console is off
    #[clap(long)]
    console: bool,

    /// redraw interval in milliseconds while a timer runs
    #[clap(long)]
    render_wait: Option<u64>,

    /// print every frame as a JSON line instead of the text board
    #[clap(long)]
    json: bool,
}

/// Prints the board whenever the order or the running split changes
#[derive(Default)]
struct TextRenderer {
    last: Option<Vec<(String, bool)>>,
}

impl Renderer for TextRenderer {
    fn draw(&mut self, view: &RenderView) {
        let key: Vec<(String, bool)> = view
            .splits
            .iter()
            .map(|s| (s.name.clone(), s.running))
            .collect();
        if self.last.as_ref() == Some(&key) {
            return;
        }
        self.last = Some(key);

        let mut out = io::stdout().lock();
        for (position, split) in view.splits.iter().enumerate() {
            let marker = if position == 0 { '>' } else { ' ' };
            let _ = writeln!(
                out,
                "{} {:<24} {}  best {}  avg {}  ({} attempts)",
                marker, split.name, split.current, split.best, split.average, split.attempts
            );
        }
        let _ = writeln!(
            out,
            "  {:<24} {}  best {}  avg {}",
            "Total", view.total, view.total_best, view.total_average
        );
        let _ = out.flush();
    }
}

/// Prints every frame as one JSON line
struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn draw(&mut self, view: &RenderView) {
        match view.to_json() {
            Ok(line) => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{}", line);
                let _ = out.flush();
            }
            Err(e) => log::error!("Failed to encode frame: {}", e),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut timer = SplitTimer::from_file(&cli.config)?;

    if let Some(wait) = cli.render_wait {
        timer.set_render_wait(Duration::from_millis(wait));
    }

    let mut renderer: Box<dyn Renderer> = if cli.json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TextRenderer::default())
    };

    if !(cli.console || timer.settings().use_console) {
        log::warn!("Console disabled (general.use_console = false), nothing can drive the timer");
        renderer.draw(&timer.collection().view());
        return Ok(());
    }

    timer.start_console(BufReader::new(io::stdin()))?;
    timer.run(renderer.as_mut());

    Ok(())
}
