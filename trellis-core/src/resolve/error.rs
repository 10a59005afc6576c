//! Resolution errors.

use thiserror::Error;

use crate::module::FactoryError;
use crate::path::Path;

/// Why a resolution pass failed.
///
/// A missing declaration is not an error: resolving a path nothing
/// declares yields no value and an unchanged store.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The factory owning `path` returned an error. Nothing from the
    /// failing branch was committed; writes from strictly earlier sibling
    /// resolutions stand.
    #[error("factory at `{path}` failed")]
    Factory {
        /// The resolved path of the failing declaration.
        path: Path,
        #[source]
        source: FactoryError,
    },

    /// A path was re-entered while its own resolution was still in
    /// progress. The chain lists the paths from the first occurrence back
    /// around to the repeat.
    #[error("cyclic dependency: {}", format_cycle(.chain))]
    Cycle {
        /// The resolution stack from the first occurrence of the
        /// re-entered path, closed by the repeat.
        chain: Vec<Path>,
    },
}

fn format_cycle(chain: &[Path]) -> String {
    chain
        .iter()
        .map(Path::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_names_the_chain() {
        let error = ResolveError::Cycle {
            chain: vec![Path::parse("/a"), Path::parse("/b"), Path::parse("/a")],
        };
        assert_eq!(error.to_string(), "cyclic dependency: /a -> /b -> /a");
    }

    #[test]
    fn factory_error_names_the_path_and_chains_the_source() {
        use std::error::Error as _;

        let error = ResolveError::Factory {
            path: Path::parse("/broken"),
            source: "connection refused".into(),
        };
        assert_eq!(error.to_string(), "factory at `/broken` failed");
        assert_eq!(
            error.source().map(ToString::to_string),
            Some("connection refused".to_owned())
        );
    }
}
