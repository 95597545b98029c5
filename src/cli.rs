use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rustsedio")]
#[command(about = "A Rust CLI tool for self-encrypting drive security transport operations")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a drive and print its identity and security capabilities
    Identify {
        /// Block device path (e.g. /dev/sdb)
        #[arg(value_name = "DEVICE")]
        device: String,

        /// Emit the device identity as JSON
        #[arg(long)]
        json: bool,
    },

    /// Issue a TRUSTED RECEIVE and dump or save the returned payload
    Recv {
        /// Block device path
        #[arg(value_name = "DEVICE")]
        device: String,

        /// Security protocol id (e.g. 1 for TCG discovery)
        #[arg(short, long, default_value = "1")]
        protocol: u8,

        /// Security-protocol-specific comID
        #[arg(short, long, default_value = "1")]
        comid: u16,

        /// Transfer length in bytes (multiple of 512)
        #[arg(short, long, default_value = "512")]
        length: u32,

        /// Write the raw payload to this file instead of hex-dumping it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Issue a TRUSTED SEND with a payload read from a file
    Send {
        /// Block device path
        #[arg(value_name = "DEVICE")]
        device: String,

        /// Security protocol id
        #[arg(short, long, default_value = "1")]
        protocol: u8,

        /// Security-protocol-specific comID
        #[arg(short, long, default_value = "1")]
        comid: u16,

        /// File containing the payload to send (padded to a 512-byte multiple)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
