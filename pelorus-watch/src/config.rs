//! Command-line configuration.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pelorus-watch",
    version,
    about = "Shipboard celestial watch: sun/moon events for a moving observer"
)]
pub struct Config {
    /// Telemetry feed address (host:port) serving NMEA RMC sentences.
    #[arg(long, default_value = "127.0.0.1:20175")]
    pub feed: String,

    /// Path to the JPL SPK planetary kernel (e.g. de421.bsp).
    #[arg(long, default_value = "de421.bsp")]
    pub kernel: PathBuf,

    /// Width of the speed/course smoothing window, in seconds.
    #[arg(long, default_value_t = 20)]
    pub smoothing_seconds: u32,

    /// Directory for the daily logbook files.
    #[arg(long, default_value = "log")]
    pub logbook_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["pelorus-watch"]);
        assert_eq!(config.feed, "127.0.0.1:20175");
        assert_eq!(config.kernel, PathBuf::from("de421.bsp"));
        assert_eq!(config.smoothing_seconds, 20);
        assert_eq!(config.logbook_dir, PathBuf::from("log"));
    }

    #[test]
    fn overrides() {
        let config = Config::parse_from([
            "pelorus-watch",
            "--feed",
            "10.0.0.5:4800",
            "--kernel",
            "/data/de440s.bsp",
            "--smoothing-seconds",
            "60",
        ]);
        assert_eq!(config.feed, "10.0.0.5:4800");
        assert_eq!(config.kernel, PathBuf::from("/data/de440s.bsp"));
        assert_eq!(config.smoothing_seconds, 60);
    }
}
