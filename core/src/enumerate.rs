//! Ready-made enumerators
//!
//! Two shapes of enumeration cover the load commands:
//! - amount-driven: a fixed number of tokens, drawn from a key list
//!   ([`RandomSample`]) or generated from an index ([`IndexedNames`])
//! - discovery-driven: tokens found by paging through a remote listing
//!   until the first entry outside a prefix ([`PrefixDiscovery`])

use std::path::Path;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::{BoxError, Result, StressError};
use crate::queue::TokenSink;
use crate::traits::Enumerator;

/// Read one key per line from `path`, `-` meaning stdin
///
/// Blank lines are skipped and trailing `\r` is stripped.
pub async fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if path == Path::new("-") {
        collect_lines(BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(path).await?;
        collect_lines(BufReader::new(file)).await
    }
}

async fn collect_lines<R>(reader: R) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut keys = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let key = line.trim_end_matches('\r');
        if !key.is_empty() {
            keys.push(key.to_string());
        }
    }
    Ok(keys)
}

// ============================================================================
// Amount-driven
// ============================================================================

/// `amount` uniform random draws (with replacement) from a key list
#[derive(Debug)]
pub struct RandomSample {
    keys: Vec<String>,
    amount: usize,
    rng: StdRng,
}

impl RandomSample {
    /// Sample `amount` keys from `keys`
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Enumeration`] if `keys` is empty while
    /// `amount` is not zero.
    pub fn new(keys: Vec<String>, amount: usize) -> Result<Self> {
        Self::with_rng(keys, amount, StdRng::from_entropy())
    }

    /// Like [`RandomSample::new`] with a fixed seed, for reproducible runs
    pub fn with_seed(keys: Vec<String>, amount: usize, seed: u64) -> Result<Self> {
        Self::with_rng(keys, amount, StdRng::seed_from_u64(seed))
    }

    fn with_rng(keys: Vec<String>, amount: usize, rng: StdRng) -> Result<Self> {
        if keys.is_empty() && amount > 0 {
            return Err(StressError::enumeration("no keys to sample from"));
        }
        Ok(Self { keys, amount, rng })
    }
}

impl Enumerator for RandomSample {
    async fn enumerate(&mut self, sink: TokenSink) -> Result<()> {
        for _ in 0..self.amount {
            let idx = self.rng.gen_range(0..self.keys.len());
            sink.add(self.keys[idx].clone()).await?;
        }
        Ok(())
    }
}

/// `amount` tokens of the form `<prefix><index>`, index counting from zero
#[derive(Debug, Clone)]
pub struct IndexedNames {
    prefix: String,
    amount: usize,
}

impl IndexedNames {
    /// Create the enumerator
    pub fn new(prefix: impl Into<String>, amount: usize) -> Self {
        Self {
            prefix: prefix.into(),
            amount,
        }
    }
}

impl Enumerator for IndexedNames {
    async fn enumerate(&mut self, sink: TokenSink) -> Result<()> {
        for i in 0..self.amount {
            sink.add(format!("{}{}", self.prefix, i)).await?;
        }
        Ok(())
    }
}

// ============================================================================
// Discovery-driven
// ============================================================================

/// One page of a lexicographically ordered remote listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Entry identifiers, in listing order
    pub items: Vec<String>,

    /// Whether another page follows
    pub has_more: bool,

    /// Cursor to pass as `after` for the next page
    pub next_offset: String,
}

/// A paginated listing that can be walked from a cursor
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch up to `amount` entries strictly after `after`
    async fn fetch(&self, after: &str, amount: usize) -> std::result::Result<Page, BoxError>;
}

/// Enumerates every listed entry that starts with `prefix`
///
/// The cursor starts at the prefix itself. Listing stops at the first
/// entry outside the prefix or when the source reports no more pages.
/// A failed page fetch fails the whole setup.
#[derive(Debug)]
pub struct PrefixDiscovery<S> {
    source: S,
    prefix: String,
    page_size: usize,
}

impl<S: PageSource> PrefixDiscovery<S> {
    /// Walk `source` in pages of `page_size`, keeping entries under `prefix`
    pub fn new(source: S, prefix: impl Into<String>, page_size: usize) -> Self {
        Self {
            source,
            prefix: prefix.into(),
            page_size: page_size.max(1),
        }
    }
}

impl<S: PageSource> Enumerator for PrefixDiscovery<S> {
    async fn enumerate(&mut self, sink: TokenSink) -> Result<()> {
        let mut cursor = self.prefix.clone();
        let mut pages = 0usize;

        loop {
            let page = self
                .source
                .fetch(&cursor, self.page_size)
                .await
                .map_err(StressError::Enumeration)?;
            pages += 1;

            tracing::debug!(
                page = pages,
                after = %cursor,
                items = page.items.len(),
                has_more = page.has_more,
                "Fetched listing page"
            );

            for item in page.items {
                if !item.starts_with(&self.prefix) {
                    return Ok(());
                }
                sink.add(item).await?;
            }

            if !page.has_more {
                return Ok(());
            }
            cursor = page.next_offset;
        }
    }
}
