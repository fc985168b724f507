use thiserror::Error;
use treebank_protocol::{Sentence, TokenRecord};

use crate::graph::DependencyTree;

/// A structural problem in a sentence's dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("head cycle through tokens {}", .ids.join(", "))]
    Cycle { ids: Vec<String> },

    #[error("sentence has no root token")]
    NoRoot,

    #[error("sentence has several root tokens: {}", .ids.join(", "))]
    MultipleRoots { ids: Vec<String> },
}

fn ids(tokens: &[&TokenRecord]) -> Vec<String> {
    tokens.iter().map(|token| token.id().to_string()).collect()
}

/// Checks that the words of `sentence` form a single rooted tree.
pub fn validate_tree(sentence: &Sentence) -> Vec<TreeError> {
    let tree = DependencyTree::from_sentence(sentence);
    if tree.is_empty() {
        return Vec::new();
    }

    let mut errors: Vec<TreeError> = tree
        .cycles()
        .iter()
        .map(|cycle| TreeError::Cycle { ids: ids(cycle) })
        .collect();

    let roots = tree.roots();
    match roots.len() {
        0 => errors.push(TreeError::NoRoot),
        1 => {}
        _ => errors.push(TreeError::MultipleRoots { ids: ids(&roots) }),
    }
    errors
}
