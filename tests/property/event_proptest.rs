//! SSE chunking invariants

use link_ai::shared::event::chunk_content;
use proptest::prelude::*;

proptest! {
    #[test]
    fn chunks_reassemble_content(content in "\\PC{0,500}", size in 1usize..64) {
        let chunks = chunk_content(&content, size);
        prop_assert_eq!(chunks.concat(), content);
    }

    #[test]
    fn chunks_respect_size(content in "\\PC{0,500}", size in 1usize..64) {
        for chunk in chunk_content(&content, size) {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.chars().count() <= size);
        }
    }
}
