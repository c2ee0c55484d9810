use clap::Parser;
use ets_calibrate::{
    args::{convert_filter, Args},
    CaptureSession, Config, Console, PeakLevel, SineGenerator,
};
use std::{process, sync::Arc};
use tracing::{info, warn};

/// Tell the operator what a run would have looked like, then give up
fn usage_error(config: &Config, lead: &str, frequency: i64) -> ! {
    println!("{}", lead);
    println!("Usage: ets_calibrate <source frequency (Hz)>");
    println!("Source Frequency: {}", frequency);
    println!("Real ADC Sample Rate: {}", config.sampler_hz);
    println!("Equivalent Sampling Rate: N/A");
    println!("Number of Samples: N/A");
    process::exit(1)
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // Help and version requests are not errors
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // Diagnostics go out on stdout below; the clap message is just extra detail
            e.print().ok();
            usage_error(&Config::default(), "Invalid usage", 0)
        }
    };

    // Get the CLI options
    let config = args.config();
    // Set the log level and start the subscriber
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .with_writer(std::io::stderr)
        .init();

    let source_hz = match args.frequency.as_deref() {
        None => usage_error(&config, "Invalid usage", 0),
        Some(s) => match config.parse_source(s) {
            Ok(f) => f,
            Err(e) => {
                warn!(%e, "Rejected source frequency");
                usage_error(
                    &config,
                    "Please use numeric input for source frequency between 100Hz and 500MHz.",
                    s.trim().parse().unwrap_or(0),
                )
            }
        },
    };

    let analyzer = PeakLevel::new(config.output_dir.clone());
    let mut session = CaptureSession::new(
        config,
        Arc::new(SineGenerator),
        analyzer,
        Console::stdio(),
    );
    let outcome = session.run(source_hz);
    info!(exit_code = outcome.exit_code(), "Session finished");
    process::exit(outcome.exit_code())
}
