use clap::Parser;
use drone::app::App;
use drone::config;
use drone::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "droned", version, about = "Drone cursor daemon", long_about = None)]
struct Args {
    /// Listen on this socket instead of the configured one
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Write the default config file (if missing), print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default();
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }

    let (tx, rx) = async_channel::bounded(64);

    // Start Background Services
    runtime::start_background_services(tx, &config)?;

    App::new(&config).run(rx);
    Ok(())
}
