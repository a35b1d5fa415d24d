//! Corpus Output
//!
//! Writes aligned records as VRT files, one per language plus one for the
//! auxiliary annotations, keyed by sequence id.

mod tokenizer;
mod vrt;

pub use tokenizer::{Tokenizer, WordTokenizer};
pub use vrt::{render_vrt, CorpusFiles, CorpusStream, CorpusWriter};
