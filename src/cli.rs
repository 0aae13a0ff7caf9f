use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hnfeed")]
#[command(about = "Scroll the Hacker News top stories and their comment threads", long_about = None)]
pub struct Cli {
    /// Theme name (dark or light)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/hnfeed)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Base URL of the item API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,
}
