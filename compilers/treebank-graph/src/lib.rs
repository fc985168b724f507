pub mod graph;
pub mod validate;

pub use graph::{Arc, DependencyTree};
pub use validate::{validate_tree, TreeError};

#[cfg(test)]
mod tests {
    use super::*;
    use treebank_parser::parse_sentence;

    #[test]
    fn test_parsed_sentence_validation() {
        // 1. A well-formed sentence
        let ok = "1\tI\tI\tPRON\t_\t_\t2\tnsubj\t_\t_\n2\tran\trun\tVERB\t_\t_\t0\troot\t_\t_\n";
        let sentence = parse_sentence(ok).unwrap().sentence;
        assert!(validate_tree(&sentence).is_empty());

        // 2. Both words claim the root
        let two_roots = "1\tI\tI\tPRON\t_\t_\t0\troot\t_\t_\n2\tran\trun\tVERB\t_\t_\t0\troot\t_\t_\n";
        let sentence = parse_sentence(two_roots).unwrap().sentence;
        let errors = validate_tree(&sentence);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TreeError::MultipleRoots { .. }));
    }
}
