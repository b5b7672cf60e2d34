//! Extract — multi-line crash block extraction.
//!
//! Walks a pushback line source and cuts out contiguous blocks of lines that
//! a catalog signature claims: a begin-tag line, then every continuation
//! line, stopping at an explicit end tag, a fresh begin, or plain noise.
//! The line that ends a block is pushed back — it may begin the next one.

use std::io::{self, BufRead};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::record::Block;

use super::source::PushbackLines;

pub struct BlockExtractor<B> {
    source: PushbackLines<B>,
    catalog: Arc<Catalog>,
    pending_err: Option<io::Error>,
}

impl<B: BufRead> BlockExtractor<B> {
    pub fn new(reader: B, catalog: Arc<Catalog>) -> Self {
        Self {
            source: PushbackLines::new(reader),
            catalog,
            pending_err: None,
        }
    }

    /// Collect continuation lines for a block opened by `first`.
    ///
    /// Reads until the first non-continuation line, which is pushed back for
    /// the outer scan loop. A read error mid-block finalizes the block as-is
    /// and is re-surfaced on the next iterator step.
    fn collect_block(&mut self, signature: usize, first: String) -> Block {
        let sig = &self.catalog.signatures[signature];
        let mut lines = vec![first];

        while let Some(item) = self.source.next() {
            let line = match item {
                Ok(line) => line,
                Err(err) => {
                    self.pending_err = Some(err);
                    break;
                }
            };
            if self.catalog.is_continuation(sig, &line) {
                lines.push(line);
            } else {
                self.source.put(line);
                break;
            }
        }

        tracing::debug!(signature = %sig.name, lines = lines.len(), "block extracted");
        Block { lines, signature }
    }
}

impl<B: BufRead> Iterator for BlockExtractor<B> {
    type Item = io::Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_err.take() {
            return Some(Err(err));
        }

        loop {
            let line = match self.source.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            if let Some(signature) = self.catalog.match_begin(&line) {
                return Some(Ok(self.collect_block(signature, line)));
            }
        }
    }
}
