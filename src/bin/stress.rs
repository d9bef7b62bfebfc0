use clap::{App, Arg};
use colored::*;
use sensorbus::config::{PollConfig, SensorbusConfig};
use sensorbus::observer::{RunObserver, StopReason, TracingObserver};
use sensorbus::profile::ProfileSet;
use sensorbus::runner::{cancel_on_interrupt, RunLoop};
use sensorbus::signal::GaussianNoise;
use sensorbus::source::SyntheticSource;
use sensorbus::stats::RunSummary;
use sensorbus::transmit::{HttpTransmitter, Outcome};
use sensorbus::Reading;
use std::io::Write;
use std::time::Duration;
use tracing::Level;

/// Refreshing status line on the terminal, log records for everything else.
struct ConsoleObserver {
    logs: TracingObserver,
}

impl RunObserver for ConsoleObserver {
    fn on_attempt(&mut self, reading: &Reading, outcome: &Outcome, progress: &RunSummary) {
        if let Outcome::Failure(_) = outcome {
            println!();
        }
        self.logs.on_attempt(reading, outcome, progress);
        print!("\r{}", progress);
        let _ = std::io::stdout().flush();
    }

    fn on_finished(&mut self, summary: &RunSummary, reason: StopReason) {
        self.logs.on_finished(summary, reason);

        if reason == StopReason::Cancelled {
            println!("\n{}", "Test stopped by user".yellow());
        }
        println!("\n\n{}", "Final Statistics:".bright_green().bold());
        println!("  {} {:.1} seconds", "Total Time:".bright_cyan(), summary.elapsed_seconds);
        println!("  {} {}", "Successful Requests:".bright_cyan(), summary.successful.to_string().green());
        println!("  {} {}", "Failed Requests:".bright_cyan(), summary.failed.to_string().red());
        println!("  {} {:.1}", "Average Requests/Second:".bright_cyan(), summary.requests_per_second);
        println!("  {} {:.1}%", "Overall Success Rate:".bright_cyan(), summary.success_rate);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("sensorbus-stress")
        .version("0.1.0")
        .about("📈 API stress test tool for sensor data")
        .arg(
            Arg::with_name("duration")
                .short("d")
                .long("duration")
                .value_name("SECONDS")
                .help("Duration of the test in seconds (ignored if --infinite is set)")
                .takes_value(true)
                .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|_| "Duration must be a whole number of seconds".into())),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .value_name("SECONDS")
                .help("Delay between requests in seconds")
                .takes_value(true)
                .validator(|v| match v.parse::<f64>() {
                    Ok(delay) if Duration::try_from_secs_f64(delay).is_ok() => Ok(()),
                    _ => Err("Delay must be a non-negative number of seconds within range".into()),
                }),
        )
        .arg(
            Arg::with_name("infinite")
                .long("infinite")
                .help("Run the test indefinitely until Ctrl+C is pressed"),
        )
        .arg(
            Arg::with_name("url")
                .short("u")
                .long("url")
                .value_name("URL")
                .help("Base URL of the ingestion endpoint (default: http://localhost:3000)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("profiles")
                .long("profiles")
                .value_name("FILE")
                .help("JSON sensor profiles replacing the built-in ones")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for reproducible noise")
                .takes_value(true)
                .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|_| "Seed must be a number".into())),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log every request"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = match matches.value_of("config") {
        Some(path) => SensorbusConfig::from_json_file(path)?,
        None => SensorbusConfig::default(),
    };
    if let Some(url) = matches.value_of("url") {
        config.endpoint.base_url = url.to_string();
    }
    let poll = PollConfig::new(
        matches.value_of("duration").map_or(Ok(config.poll.duration_s), str::parse::<u64>)?,
        matches.value_of("delay").map_or(Ok(config.poll.delay_s), str::parse::<f64>)?,
        matches.is_present("infinite") || config.poll.infinite,
    )?;

    let profiles = match matches.value_of("profiles") {
        Some(path) => ProfileSet::from_json_file(path)?,
        None => ProfileSet::synthetic(),
    };
    let noise = match matches.value_of("seed") {
        Some(seed) => GaussianNoise::seeded(seed.parse()?),
        None => GaussianNoise::from_entropy(),
    };

    let transmitter = HttpTransmitter::new(&config.endpoint);
    if poll.infinite {
        println!("{} indefinitely with {}s delay between requests", "Starting stress test".bright_blue().bold(), poll.delay_s);
    } else {
        println!(
            "{} for {} seconds with {}s delay between requests",
            "Starting stress test".bright_blue().bold(),
            poll.duration_s,
            poll.delay_s
        );
    }
    println!("{} {}", "Target:".dimmed(), transmitter.url());
    println!("{}", "Press Ctrl+C to stop the test".dimmed());

    let mut source = SyntheticSource::new(&profiles, noise);
    let mut run_loop = RunLoop::new(transmitter, ConsoleObserver { logs: TracingObserver::new() });
    let interrupt = cancel_on_interrupt(run_loop.cancellation_token());

    run_loop.run_polling(&mut source, &poll).await;
    interrupt.abort();

    Ok(())
}
