use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cms_core::entity_kind::EntityKind;
use cms_core::error::CoreError;

use crate::DEFAULT_STORE_PATH;

#[derive(Parser, Debug)]
#[command(name = "cms-admin")]
#[command(about = "Inspect and clean up admin panel drafts")]
#[command(version)]
pub struct Cli {
    /// Draft store file (defaults to $DRAFT_STORE_PATH, then ./drafts.json)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn store_path(&self) -> PathBuf {
        self.store
            .clone()
            .or_else(|| std::env::var_os("DRAFT_STORE_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List drafts, most recent first
    List {
        /// Only this content type (e.g. news, success-stories)
        #[arg(short, long, value_parser = parse_kind)]
        namespace: Option<EntityKind>,
    },
    /// Print one draft as JSON
    Show {
        #[arg(value_parser = parse_kind)]
        namespace: EntityKind,
        modal_id: String,
    },
    /// Delete one draft
    Delete {
        #[arg(value_parser = parse_kind)]
        namespace: EntityKind,
        modal_id: String,
    },
    /// Delete drafts and open windows never saved to the server
    ClearUnsaved {
        #[arg(value_parser = parse_kind)]
        namespace: EntityKind,
    },
    /// Delete every draft and open window of a content type
    ClearAll {
        #[arg(value_parser = parse_kind)]
        namespace: EntityKind,
    },
}

fn parse_kind(value: &str) -> Result<EntityKind, CoreError> {
    EntityKind::from_namespace(value)
}
