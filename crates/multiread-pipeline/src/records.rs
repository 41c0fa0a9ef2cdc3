//! JSON record decoding over one or many sources
//!
//! Records are whitespace-separated JSON values (typically one object per
//! line). Several sources can be decoded as one stream through a
//! [`ChainedReader`], or one at a time; both give the same records.

use crate::chain::chain;
use multiread_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::io::{BufReader, Read};

/// Decode every JSON value in `reader`
pub fn decode_stream<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::Deserializer::from_reader(BufReader::new(reader))
        .into_iter::<T>()
        .map(|record| record.map_err(decode_error))
        .collect()
}

/// Decode all `sources` as a single concatenated stream
pub fn decode_chained<T, I>(sources: I) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    I: IntoIterator,
    I::Item: Read,
{
    let chained = chain(sources);
    let source_count = chained.len();
    let records = decode_stream(chained)?;
    tracing::debug!("Decoded {} records from {} chained sources", records.len(), source_count);
    Ok(records)
}

/// Decode each source on its own and concatenate the results
pub fn decode_each<T, I>(sources: I) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    I: IntoIterator,
    I::Item: Read,
{
    let mut records = Vec::new();
    for (index, source) in sources.into_iter().enumerate() {
        let batch: Vec<T> = decode_stream(source)?;
        tracing::trace!("Source {} yielded {} records", index + 1, batch.len());
        records.extend(batch);
    }
    Ok(records)
}

// I/O failures inside the deserializer are source errors, not bad JSON
fn decode_error(err: serde_json::Error) -> Error {
    if err.is_io() {
        Error::SourceRead(err.into())
    } else {
        Error::Decode(err)
    }
}
