use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use summarizer_core::StatusTag;
use summarizer_logging::{app_info, app_warn};

use crate::config::{AppConfig, LOG_FILENAME};
use crate::controller::SubmissionController;
use crate::render::{render, TITLE};

const QUIT_COMMAND: &str = ":q";

/// Entry point of the `summarizer` binary.
///
/// With URL arguments, summarizes each in turn and fails if any of them did.
/// Without arguments, reads one URL per line from stdin until EOF or `:q`.
pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    summarizer_logging::initialize(
        config.log_destination.into(),
        config.log_level_filter()?,
        Path::new(LOG_FILENAME),
    );
    app_info!("Using summarization endpoint {}", config.endpoint);

    let mut controller = SubmissionController::new(config.client_settings())
        .context("starting summarization engine")?;
    let settle_timeout = config.settle_timeout();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    if urls.is_empty() {
        let stdin = io::stdin();
        run_interactive(&mut controller, stdin.lock(), stdout.lock(), settle_timeout)
    } else {
        run_batch(&mut controller, &urls, stdout.lock(), settle_timeout)
    }
}

/// Summarize `urls` one after another, rendering each outcome.
pub fn run_batch<W: Write>(
    controller: &mut SubmissionController,
    urls: &[String],
    mut output: W,
    settle_timeout: Duration,
) -> anyhow::Result<()> {
    let mut failures = 0usize;
    for url in urls {
        if let Err(err) = controller.submit(url) {
            writeln!(output, "{url}: {err}")?;
            failures += 1;
            continue;
        }
        settle(controller, &mut output, settle_timeout)?;
        write!(output, "{}", render(&controller.view(), controller.completed_at()))?;
        if controller.view().status == StatusTag::Failed {
            failures += 1;
        }
    }
    output.flush()?;

    if failures > 0 {
        bail!("{failures} of {} submissions failed", urls.len());
    }
    Ok(())
}

/// Line-oriented form: each line is one submit event.
pub fn run_interactive<R: BufRead, W: Write>(
    controller: &mut SubmissionController,
    input: R,
    mut output: W,
    settle_timeout: Duration,
) -> anyhow::Result<()> {
    writeln!(output, "{TITLE}\n")?;
    write!(output, "{}", render(&controller.view(), None))?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line.context("reading input")?;
        if line.trim() == QUIT_COMMAND {
            break;
        }

        controller.input_changed(&line);
        if controller.submit(&line).is_ok() {
            settle(controller, &mut output, settle_timeout)?;
        }
        write!(output, "{}", render(&controller.view(), controller.completed_at()))?;
        prompt(&mut output)?;
    }
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "\n> ")?;
    output.flush()
}

/// Wait for the in-flight request. The engine enforces its own timeouts, so
/// this only loops if the service is slower than `settle_timeout`.
fn settle<W: Write>(
    controller: &mut SubmissionController,
    output: &mut W,
    settle_timeout: Duration,
) -> io::Result<()> {
    writeln!(output, "Loading...")?;
    output.flush()?;
    while !controller.wait_until_settled(settle_timeout) {
        app_warn!("Request still pending after {:?}", settle_timeout);
        writeln!(output, "Still waiting for the summarization service...")?;
        output.flush()?;
    }
    Ok(())
}
