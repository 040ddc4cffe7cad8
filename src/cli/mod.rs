//! Command line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Activity Tracker API - activities, routes and track points per user
#[derive(Parser)]
#[command(name = "activity-tracker-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
