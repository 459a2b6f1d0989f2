//! Streaming write path.

use futures::stream::{BoxStream, StreamExt};
use serde::Serialize;

use crate::codec;
use crate::traits::{AsyncSequence, Token, TokenWriter};
use crate::{BoxError, Error};

/// Encodes each produced element, mapping production failures to
/// [`Error::Source`].
pub(crate) fn encode_stream<'a, E>(
    elements: BoxStream<'a, Result<E, BoxError>>,
) -> BoxStream<'a, Result<Token, Error>>
where
    E: Serialize + 'a,
{
    elements
        .map(|item| item.map_err(Error::Source).and_then(|element| codec::encode(&element)))
        .boxed()
}

/// Writes `[`, one token per element in production order, then `]`.
///
/// Elements are pulled one at a time; the write suspends whenever the
/// stream does. On failure the tokens already written stay written.
/// Returns the number of elements written.
pub async fn write_sequence<W>(
    writer: &mut W,
    mut elements: BoxStream<'_, Result<Token, Error>>,
) -> Result<usize, Error>
where
    W: TokenWriter + ?Sized,
{
    writer.write_start_array()?;
    let mut count = 0usize;
    while let Some(token) = elements.next().await {
        writer.write_token(&token?)?;
        count += 1;
        tracing::trace!(count, "wrote element");
    }
    writer.write_end_array()?;
    Ok(count)
}

/// Writes the elements of `sequence` as an array.
///
/// # Example
///
/// ```ignore
/// let list: SequenceList<u32> = (1..=3).collect();
/// let mut writer = JsonWriter::new();
/// write_elements(&mut writer, &list).await?;
/// assert_eq!(writer.buf(), "[1,2,3]");
/// ```
pub async fn write_elements<W, S>(writer: &mut W, sequence: &S) -> Result<usize, Error>
where
    W: TokenWriter + ?Sized,
    S: AsyncSequence + ?Sized,
    S::Item: Serialize,
{
    write_sequence(writer, encode_stream(sequence.elements())).await
}
