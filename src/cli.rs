//! 命令行参数

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Page Analyzer web server.
#[derive(Debug, Parser)]
#[command(name = "page-analyzer")]
#[command(about = "Stores websites and checks their basic SEO signals", long_about = None)]
pub struct Args {
    /// Path to a TOML config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// IP address to listen on (overrides config and PAGE_ANALYZER_SERVER_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and PORT).
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// 命令行参数优先级最高
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
