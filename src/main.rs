use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use ywt_gateway::replay::replay;
use ywt_gateway::{Cli, GatewayConfig, GatewayError, Mode, PositionSink, StdoutSink};
use ywt_protocol::{MemoryRegistry, SentenceDecoder};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // clap prints usage and exits 2 on bad arguments.
    let config = GatewayConfig::from(Cli::parse());

    if let Err(e) = run(config) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    let registry = MemoryRegistry::from_reader(BufReader::new(File::open(&config.devices)?))?;
    info!("{} device(s) registered from {}", registry.len(), config.devices.display());

    let decoder = Arc::new(SentenceDecoder::with_config(registry, config.decoder));
    let sink: Arc<dyn PositionSink> = Arc::new(StdoutSink);

    match config.mode {
        Mode::Listen(addr) => {
            // Runtime only for the TCP host; replay and serial stay synchronous.
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ywt_gateway::server::run(addr, decoder, sink))?;
        }
        Mode::Replay(None) => {
            replay(io::stdin().lock(), &decoder, sink.as_ref())?;
        }
        Mode::Replay(Some(path)) => {
            replay(BufReader::new(File::open(path)?), &decoder, sink.as_ref())?;
        }
        #[cfg(feature = "serial")]
        Mode::Serial { port, baud } => {
            ywt_gateway::serial::run(&port, baud, &decoder, sink.as_ref())?;
        }
        #[cfg(not(feature = "serial"))]
        Mode::Serial { .. } => {
            return Err(GatewayError::Usage(
                "serial mode needs a build with the `serial` feature".to_string(),
            ));
        }
    }

    Ok(())
}
