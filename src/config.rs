use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ywt_protocol::DecoderConfig;

/// Default TCP port for tracker connections.
pub const DEFAULT_PORT: u16 = 5036;

/// Default TCP listen address, all interfaces on [`DEFAULT_PORT`].
pub const DEFAULT_LISTEN: &str = "0.0.0.0:5036";

/// Default serial baud rate.
pub const DEFAULT_BAUD: u32 = 9600;

#[derive(Parser, Debug)]
#[command(name = "ywt-gateway")]
#[command(about = "Decode YWT tracker sentences and acknowledge reports")]
#[command(version)]
pub struct Cli {
    /// Registry file of `<hardware-id> <internal-id>` lines
    #[arg(short, long)]
    pub devices: PathBuf,

    /// Comma-separated report types to acknowledge (default: KP,EP)
    #[arg(long, value_delimiter = ',')]
    pub ack: Option<Vec<String>>,

    /// Where sentences come from (default: listen)
    #[command(subcommand)]
    pub mode: Option<ModeCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ModeCommand {
    /// Accept tracker connections over TCP
    Listen {
        #[arg(default_value = DEFAULT_LISTEN)]
        addr: SocketAddr,
    },
    /// Decode captured sentences from a file, or stdin if omitted or `-`
    Replay { file: Option<PathBuf> },
    /// Read a serially attached tracker (needs the `serial` feature)
    Serial {
        port: String,
        #[arg(default_value_t = DEFAULT_BAUD)]
        baud: u32,
    },
}

/// Where sentences come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Listen(SocketAddr),
    /// `None` reads stdin.
    Replay(Option<PathBuf>),
    Serial { port: String, baud: u32 },
}

impl From<Option<ModeCommand>> for Mode {
    fn from(command: Option<ModeCommand>) -> Self {
        match command {
            None => Mode::Listen(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))),
            Some(ModeCommand::Listen { addr }) => Mode::Listen(addr),
            Some(ModeCommand::Replay { file }) => {
                Mode::Replay(file.filter(|f| f.as_os_str() != "-"))
            }
            Some(ModeCommand::Serial { port, baud }) => Mode::Serial { port, baud },
        }
    }
}

/// Configuration for the gateway binary.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Registry file of `<hardware-id> <internal-id>` lines.
    pub devices: PathBuf,
    pub mode: Mode,
    pub decoder: DecoderConfig,
}

impl From<Cli> for GatewayConfig {
    fn from(cli: Cli) -> Self {
        let mut decoder = DecoderConfig::default();
        if let Some(ack) = cli.ack {
            decoder.ack_types = ack
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        Self { devices: cli.devices, mode: Mode::from(cli.mode), decoder }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<GatewayConfig, clap::Error> {
        let argv = std::iter::once("ywt-gateway").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(GatewayConfig::from)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--devices", "devices.txt"]).unwrap();
        assert_eq!(config.devices, PathBuf::from("devices.txt"));
        assert_eq!(config.mode, Mode::Listen(DEFAULT_LISTEN.parse().unwrap()));
        assert_eq!(config.decoder.ack_types, vec!["KP", "EP"]);
    }

    #[test]
    fn test_listen_addr() {
        let config = parse(&["-d", "d", "listen", "127.0.0.1:9000"]).unwrap();
        assert_eq!(config.mode, Mode::Listen("127.0.0.1:9000".parse().unwrap()));

        let config = parse(&["-d", "d", "listen"]).unwrap();
        assert_eq!(config.mode, Mode::Listen(DEFAULT_LISTEN.parse().unwrap()));
    }

    #[test]
    fn test_replay() {
        assert_eq!(parse(&["-d", "d", "replay"]).unwrap().mode, Mode::Replay(None));
        assert_eq!(parse(&["-d", "d", "replay", "-"]).unwrap().mode, Mode::Replay(None));
        assert_eq!(
            parse(&["-d", "d", "replay", "log.txt"]).unwrap().mode,
            Mode::Replay(Some(PathBuf::from("log.txt")))
        );
    }

    #[test]
    fn test_serial() {
        assert_eq!(
            parse(&["-d", "d", "serial", "/dev/ttyUSB0"]).unwrap().mode,
            Mode::Serial { port: "/dev/ttyUSB0".to_string(), baud: DEFAULT_BAUD }
        );
        assert_eq!(
            parse(&["-d", "d", "serial", "COM3", "115200"]).unwrap().mode,
            Mode::Serial { port: "COM3".to_string(), baud: 115200 }
        );
    }

    #[test]
    fn test_ack_override() {
        let config = parse(&["-d", "d", "--ack", "KP, AP,"]).unwrap();
        assert_eq!(config.decoder.ack_types, vec!["KP", "AP"]);
    }

    #[test]
    fn test_satellite_threshold_not_configurable() {
        assert!(parse(&["-d", "d", "--min-satellites", "4"]).is_err());
    }

    #[test]
    fn test_errors() {
        for args in [
            &[][..],
            &["--devices"][..],
            &["--devices", "d", "--verbose"][..],
            &["--devices", "d", "listen", "nowhere"][..],
            &["--devices", "d", "serial", "COM3", "fast"][..],
            &["--devices", "d", "serial"][..],
            &["--devices", "d", "broadcast"][..],
        ] {
            assert!(parse(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_help_is_not_a_config() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
