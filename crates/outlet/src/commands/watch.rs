//! Live signal stream.

use outlet_core::{Session, SignalEnvelope};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

fn wanted(filter: &[String], envelope: &SignalEnvelope) -> bool {
    filter.is_empty() || {
        let name = envelope.signal().to_string();
        filter.iter().any(|f| f.eq_ignore_ascii_case(&name))
    }
}

fn render(format: &OutputFormat, envelope: &SignalEnvelope) -> String {
    match format {
        OutputFormat::Table | OutputFormat::Plain => {
            format!("{:<32} {}", envelope.signal(), envelope.sender)
        }
        // One document per line so the output stays streamable.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_json(envelope, true)
        }
    }
}

pub async fn handle(session: &Session, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut subscription = session.subscribe();
    let mut seen = 0usize;
    if !global.quiet {
        eprintln!("Watching signals (Ctrl-C to stop)");
    }

    loop {
        let envelope = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = subscription.recv() => match next {
                Some(envelope) => envelope,
                None => break,
            },
        };
        if !wanted(&args.signal, &envelope) {
            continue;
        }

        output::print_output(&render(&global.output, &envelope), false);
        seen += 1;
        if args.count.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    tracing::debug!(seen, "watch finished");
    Ok(())
}
