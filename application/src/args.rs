//! [`Args`] definitions.

use std::str::FromStr;

use admin::domain::Route;
use clap::{Parser, Subcommand};
use derive_more::Display;

/// Admin console of the portfolio content management system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Console command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        /// Email to log in with, prompted if omitted.
        #[arg(long)]
        email: Option<String>,

        /// Password to log in with, prompted if omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the current session.
    Logout,

    /// Show the logged in operator.
    Whoami,

    /// Show the operator and an overview of the content.
    Dashboard,

    /// List the records of a content collection.
    List {
        /// Content collection, like `skills` or `projects`.
        collection: Route,
    },

    /// Create a new record in a content collection.
    Create {
        /// Content collection, like `skills` or `projects`.
        collection: Route,

        /// Field value, as `field=value`.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
    },

    /// Delete a record from a content collection.
    Delete {
        /// Content collection, like `skills` or `projects`.
        collection: Route,

        /// ID of the record to delete.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the About content, or save it if any field is set.
    About {
        /// Field value, as `field=value`.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
    },

    /// List the inbound contact messages.
    Messages {
        /// ID of the message to show in full.
        #[arg(long)]
        select: Option<String>,
    },
}

/// Value assigned to a form field on the command line.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{field}={value}")]
pub struct Assignment {
    /// Name of the field.
    pub field: String,

    /// Raw value of the field.
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("`{s}` is not a `field=value` pair"))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("`{s}` has no field name"));
        }
        Ok(Self {
            field: field.to_owned(),
            value: value.to_owned(),
        })
    }
}
