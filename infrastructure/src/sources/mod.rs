//! Proposal source adapters
//!
//! - [`ScriptedProposalSource`]: replays proposals from the config file
//! - [`CommandProposalSource`]: spawns an external program per proposal
//!
//! [`build_sources`] turns the `[[sources]]` definitions into a committee of
//! the configured size.

mod command;
mod scripted;

pub use command::CommandProposalSource;
pub use scripted::ScriptedProposalSource;

use crate::config::{FileSourceConfig, SourceKind};
use probe_application::ProposalSource;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BuildSourcesError {
    #[error("No source definitions")]
    NoDefinitions,

    #[error("Committee size must be at least 1")]
    ZeroSize,

    #[error("sources[{index}]: {reason}")]
    Invalid { index: usize, reason: String },
}

/// Instantiate `size` sources, cycling through `definitions` in order.
///
/// A definition used more than once gets a `#k` suffix on every repeat, so
/// ids stay unique: `cautious`, `bold`, `cautious#2`.
pub fn build_sources(
    definitions: &[FileSourceConfig],
    size: usize,
) -> Result<Vec<Arc<dyn ProposalSource>>, BuildSourcesError> {
    if definitions.is_empty() {
        return Err(BuildSourcesError::NoDefinitions);
    }
    if size == 0 {
        return Err(BuildSourcesError::ZeroSize);
    }

    (0..size)
        .map(|slot| {
            let index = slot % definitions.len();
            let definition = &definitions[index];
            let base_id = definition.id_or_default(index);
            let repeat = slot / definitions.len();
            let id = if repeat == 0 {
                base_id
            } else {
                format!("{}#{}", base_id, repeat + 1)
            };
            build_one(definition, index, id)
        })
        .collect()
}

fn build_one(
    definition: &FileSourceConfig,
    index: usize,
    id: String,
) -> Result<Arc<dyn ProposalSource>, BuildSourcesError> {
    let kind = definition
        .kind
        .parse::<SourceKind>()
        .map_err(|reason| BuildSourcesError::Invalid { index, reason })?;

    let source: Arc<dyn ProposalSource> = match kind {
        SourceKind::Scripted => Arc::new(ScriptedProposalSource::new(
            id,
            definition.script.clone(),
            definition.follows_majority(),
        )),
        SourceKind::Command => {
            let program = definition
                .program
                .clone()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| BuildSourcesError::Invalid {
                    index,
                    reason: "command source without a program".to_string(),
                })?;
            Arc::new(CommandProposalSource::new(
                id,
                program,
                definition.args.clone(),
            ))
        }
    };
    Ok(source)
}
