use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchforge::config::Config;
use switchforge::generator;
use switchforge::models::Switch;
use switchforge::profile;
use switchforge::templates::TemplateStore;
use switchforge::transport::serial::SerialConfigSender;
use switchforge::transport::tftp::TftpDelivery;
use switchforge::transport::{Capabilities, DeliveryEvent};

/// Parsed command line: brand, model and one output action
struct Args {
    brand: String,
    model: String,
    profile: Option<PathBuf>,
    out: Option<PathBuf>,
    tftp: Option<String>,
    serial: Option<String>,
}

fn usage() -> ! {
    eprintln!(
        "Usage: switchforge <brand> <model> [--profile FILE] (--out FILE | --tftp HOST | --serial PORT)"
    );
    std::process::exit(2);
}

fn parse_args() -> Args {
    let mut positional = Vec::new();
    let mut args = Args {
        brand: String::new(),
        model: String::new(),
        profile: None,
        out: None,
        tftp: None,
        serial: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--profile" => args.profile = Some(PathBuf::from(iter.next().unwrap_or_else(|| usage()))),
            "--out" => args.out = Some(PathBuf::from(iter.next().unwrap_or_else(|| usage()))),
            "--tftp" => args.tftp = Some(iter.next().unwrap_or_else(|| usage())),
            "--serial" => args.serial = Some(iter.next().unwrap_or_else(|| usage())),
            _ => positional.push(arg),
        }
    }
    if positional.len() != 2 {
        usage();
    }
    args.brand = positional.remove(0);
    args.model = positional.remove(0);
    args
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args();
    let cfg = Config::load();
    let capabilities = Capabilities::detect();
    tracing::info!("Starting SwitchForge");
    tracing::info!("Templates: {}", cfg.templates_dir);

    let store = TemplateStore::new(&cfg.templates_dir);
    let template = store.load(&args.brand, &args.model);
    let mut switch = Switch::new(&args.brand, &args.model, template);

    if let Some(path) = &args.profile {
        let loaded = profile::load_profile(path)?;
        loaded.apply_to(&mut switch);
    }

    let text = generator::generate_config(&switch);
    if text.is_empty() {
        anyhow::bail!("Unknown brand '{}', nothing to deliver", args.brand);
    }
    tracing::info!("Generated {} lines", text.lines().count());

    if let Some(path) = &args.out {
        tokio::fs::write(path, &text).await?;
        tracing::info!("Configuration written to {}", path.display());
    } else if let Some(host) = &args.tftp {
        if !capabilities.tftp {
            anyhow::bail!("TFTP transport not available");
        }
        let mut delivery = TftpDelivery::new(host, &cfg);
        let message = delivery.deliver(&text).await?;
        println!("{}", message);
    } else if let Some(port) = &args.serial {
        if !capabilities.serial {
            anyhow::bail!("Serial transport not available");
        }
        let mut sender = SerialConfigSender::new(port, cfg.serial_baud_rate, cfg.read_timeout);
        sender.connect()?;
        let mut events =
            sender.send_configuration(&text, Duration::from_millis(cfg.serial_line_delay_ms))?;
        while let Some(event) = events.recv().await {
            match event {
                DeliveryEvent::LineSent { index, total, .. } => {
                    tracing::info!("Sent line {}/{}", index, total)
                }
                DeliveryEvent::Progress { .. } => {}
                DeliveryEvent::Completed { message } => {
                    println!("{}", message);
                    break;
                }
                DeliveryEvent::Error { message } => anyhow::bail!("{}", message),
            }
        }
    } else {
        println!("{}", text);
    }

    Ok(())
}
