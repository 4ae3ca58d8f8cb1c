// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use lxd_provision::types::InstanceKind;

#[derive(Parser)]
#[command(name = "lxd-provision")]
#[command(about = "Provision LXD containers and virtual machines from local images")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new lxd-provision.yml configuration file
    Init {
        /// Remote hypervisor as [user@]host[:port]
        #[arg(long)]
        host: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Create, network, resize and start a new instance
    Create {
        /// Instance name (unique on the hypervisor)
        name: String,

        /// Fingerprint of a local image
        #[arg(long)]
        fingerprint: String,

        /// Memory limit, e.g. 2GB
        #[arg(long)]
        memory: String,

        /// Root disk size, e.g. 20GB
        #[arg(long)]
        disk: String,

        /// CPU limit, e.g. 2
        #[arg(long)]
        cpu: String,

        /// Static IPv4 address for the primary NIC
        #[arg(long)]
        address: String,

        /// container or virtual-machine
        #[arg(long, default_value = "container")]
        kind: InstanceKind,
    },
}
