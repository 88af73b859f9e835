//! Conversion between notation strings and vocabulary-indexed token sequences.

pub mod tokenizer;
pub mod vocabulary;

pub use tokenizer::{
    decode_indices, SequenceCodec, SplitPolicy, TokenSequence, DEFAULT_PAD_INDEX, END_TOKEN,
    SPACE_PLACEHOLDER, START_TOKEN,
};
pub use vocabulary::Vocabulary;
