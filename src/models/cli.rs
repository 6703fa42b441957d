use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Fetch perk images from the Fallout wiki")]
pub struct Cli {
    /// Config file name, with or without extension
    #[arg(short, long, default_value = "perks")]
    pub config_file: String,

    /// Where the list of images comes from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Api)]
    pub source: SourceKind,

    /// Overrides `output_directory` from the config
    #[arg(short, long)]
    pub output_directory: Option<String>,

    /// Overrides `inter_item_delay_ms` from the config
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Write a download script to PATH instead of downloading
    #[arg(long, value_name = "PATH")]
    pub emit_script: Option<PathBuf>,

    /// Kind of script written by `--emit-script`
    #[arg(long, value_enum, default_value_t = ScriptFormat::Bash, requires = "emit_script")]
    pub script_format: ScriptFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Built-in list of known image paths
    Static,
    /// Wiki API category listing
    Api,
    /// Category page markup
    Dom,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// curl commands for a shell
    Bash,
    /// fetch loop to paste into the browser console on the wiki
    Js,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
