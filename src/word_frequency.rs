//! Longest-first word tally over unspaced text, stored in a `DoubleHashTable`

use std::cmp::Reverse;

use log::{debug, trace};

use crate::{DoubleHashTable, TableError};

/// Tallies how often each word of `lexicon` can be stripped out of `text`.
///
/// See [`word_frequency_into`] for the counting rules. A repeated word keeps its first
/// tally instead of being overwritten with 0 by its later copy.
///
/// # Errors
///
/// [`TableError::InvalidKey`] if the lexicon contains an empty word.
pub fn word_frequency<I, S>(text: &str, lexicon: I) -> Result<DoubleHashTable<usize>, TableError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = DoubleHashTable::new();
    word_frequency_into(text, lexicon, &mut table)?;
    Ok(table)
}

/// Tallies the words of `lexicon` into `table`.
///
/// Words are visited longest first, ties in lexicon order. For each word the first
/// occurrence is removed from what is left of `text` until none remains, and the number
/// of removals (0 if the word never occurs) is inserted under the word. Longer words
/// therefore claim their characters before the shorter words they contain. Entries of
/// `table` for other keys are left alone.
///
/// A word listed twice keeps the tally from its first visit. Its second visit would
/// always count 0, since the first stripped every occurrence, so it is skipped rather
/// than allowed to overwrite the real count with 0.
///
/// # Errors
///
/// [`TableError::InvalidKey`] if the lexicon contains an empty word, checked before
/// `table` is touched.
pub fn word_frequency_into<I, S>(
    text: &str,
    lexicon: I,
    table: &mut DoubleHashTable<usize>,
) -> Result<(), TableError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<S> = lexicon.into_iter().collect();
    if words.iter().any(|word| word.as_ref().is_empty()) {
        return Err(TableError::InvalidKey);
    }
    words.sort_by_key(|word| Reverse(word.as_ref().chars().count()));

    let mut remaining = text.to_owned();
    let mut tallied = DoubleHashTable::new();
    for word in &words {
        let word = word.as_ref();
        if tallied.insert(word, ())?.is_some() {
            debug!("Word {word:?} repeated in lexicon, keeping its first tally");
            continue;
        }
        let count = strip_occurrences(&mut remaining, word);
        trace!("Tallied {word:?} {count} times");
        table.insert(word, count)?;
    }
    Ok(())
}

/// Returns the tally for `word`, treating absent words as zero
#[must_use]
pub fn frequency(table: &DoubleHashTable<usize>, word: &str) -> usize {
    table.get(word).copied().unwrap_or(0)
}

/// Removes the first occurrence of `word` from `text` until none is left.
///
/// `word` must not be empty.
fn strip_occurrences(text: &mut String, word: &str) -> usize {
    let mut count: usize = 0;
    while let Some(start) = text.find(word) {
        text.replace_range(start..start.saturating_add(word.len()), "");
        count = count.saturating_add(1);
    }
    count
}
