use clap::{App, Arg};
use colored::*;
use sensorbus::config::SensorbusConfig;
use sensorbus::device::{available_ports, open_instrument};
use sensorbus::observer::TracingObserver;
use sensorbus::runner::{cancel_on_interrupt, RunLoop};
use sensorbus::signal::GaussianNoise;
use sensorbus::source::HardwareSource;
use sensorbus::transmit::HttpTransmitter;
use tracing::{error, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("sensorbus-forwarder")
        .version("0.1.0")
        .about("🔌 Forward instrument readings to the sensor ingestion endpoint")
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("DEVICE")
                .help("Serial device of the instrument (default: /dev/ttyACM0)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("baud")
                .short("b")
                .long("baud")
                .value_name("RATE")
                .help("Baud rate (default: 9600)")
                .takes_value(true)
                .validator(|v| v.parse::<u32>().map(|_| ()).map_err(|_| "Baud rate must be a number".into())),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout-ms")
                .value_name("MS")
                .help("Per-read timeout, bounds the sampling rate (default: 100)")
                .takes_value(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(ms) if ms > 0 => Ok(()),
                    _ => Err("Timeout must be a positive number of milliseconds".into()),
                }),
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
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for reproducible pressure noise")
                .takes_value(true)
                .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|_| "Seed must be a number".into())),
        )
        .arg(
            Arg::with_name("list-ports")
                .short("l")
                .long("list-ports")
                .help("List available serial ports and exit"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log every frame and request"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if matches.is_present("list-ports") {
        let ports = available_ports()?;
        if ports.is_empty() {
            println!("{}", "No serial ports found".yellow());
        }
        for port in ports {
            println!("  {} ({})", port.name.bright_cyan(), port.kind.dimmed());
        }
        return Ok(());
    }

    let mut config = match matches.value_of("config") {
        Some(path) => SensorbusConfig::from_json_file(path)?,
        None => SensorbusConfig::default(),
    };
    if let Some(port) = matches.value_of("port") {
        config.device.port = port.to_string();
    }
    if let Some(baud) = matches.value_of("baud") {
        config.device.baud_rate = baud.parse()?;
    }
    if let Some(timeout) = matches.value_of("timeout") {
        config.device.read_timeout_ms = timeout.parse()?;
    }
    if let Some(url) = matches.value_of("url") {
        config.endpoint.base_url = url.to_string();
    }

    let noise = match matches.value_of("seed") {
        Some(seed) => GaussianNoise::seeded(seed.parse()?),
        None => GaussianNoise::from_entropy(),
    };

    let mut frames = match open_instrument(&config.device) {
        Ok(frames) => frames,
        Err(e) => {
            error!("{}", e);
            println!("{} {}", "Hint:".yellow(), "use --list-ports to find the instrument");
            return Err(e.into());
        }
    };

    let transmitter = HttpTransmitter::new(&config.endpoint);
    println!(
        "{} {} → {}",
        "Forwarding".bright_blue().bold(),
        config.device.port,
        transmitter.url()
    );

    let mut source = HardwareSource::new(noise);
    let mut run_loop = RunLoop::new(transmitter, TracingObserver::announcing_sends());
    let interrupt = cancel_on_interrupt(run_loop.cancellation_token());

    let report = run_loop.run_push(&mut source, &mut frames).await;
    interrupt.abort();

    println!("{} ({})", "Forwarder stopped".bright_blue(), report.reason);
    println!("{}", report.summary);

    Ok(())
}
