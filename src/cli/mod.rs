//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the gtr binary.

use std::convert::Infallible;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::client::DEFAULT_API_URL;
use crate::format::Serialisation;

/// Gateway to Research command-line interface.
#[derive(Parser, Debug)]
#[command(name = "gtr", about = "Gateway to Research API CLI", version)]
pub struct Cli {
    /// API root.
    #[arg(long, global = true, env = "GTR_API_URL", default_value = DEFAULT_API_URL)]
    pub base_url: String,

    /// Wire serialisation to request: xml or json (unknown names mean xml).
    ///
    /// Defaults to xml, or json for the cerif commands.
    #[arg(long, global = true, env = "GTR_SERIALISATION", value_parser = parse_serialisation)]
    pub format: Option<Serialisation>,

    /// Print the raw document instead of a summary.
    #[arg(long, global = true, default_value = "false")]
    pub raw: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The serialisation to request, resolving the per-command default.
    pub fn serialisation(&self) -> Serialisation {
        self.format.unwrap_or(match self.command {
            Command::Cerif { .. } => Serialisation::Json,
            _ => Serialisation::Xml,
        })
    }
}

fn parse_serialisation(name: &str) -> Result<Serialisation, Infallible> {
    Ok(Serialisation::from_name(name))
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single resource by id.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// The resource id.
        id: String,
    },

    /// List resources one page at a time.
    List {
        /// The type of resource to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page (25 to 100).
        #[arg(long, env = "GTR_PAGE_SIZE")]
        page_size: Option<u32>,

        /// Walk every page instead of printing one.
        #[arg(long, default_value = "false")]
        all: bool,
    },

    /// Query the CERIF API.
    Cerif {
        #[command(subcommand)]
        command: CerifCommand,
    },
}

/// CERIF subcommands.
#[derive(Subcommand, Debug)]
pub enum CerifCommand {
    /// Get a CERIF project and its organisation links.
    Project {
        /// The project uuid.
        uuid: String,
    },

    /// Look up a CERIF class.
    Class {
        /// The class uuid.
        uuid: String,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A research project.
    #[value(alias = "projects")]
    Project,
    /// A research organisation.
    #[value(alias = "organisations")]
    Organisation,
    /// A researcher.
    #[value(alias = "people", alias = "persons")]
    Person,
    /// A research output.
    #[value(alias = "publications")]
    Publication,
}
