//! Newline-delimited JSON framing for streamed messages.
//!
//! Streaming calls that travel over plain HTTP bodies carry one JSON
//! message per line. The decoder is shared by the server (request bodies)
//! and the client (response bodies).

use std::fmt::Display;
use std::io;

use bytes::Buf;
use futures::{future, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

use crate::error::RpcError;

/// Content type for NDJSON bodies.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Longest accepted line, in bytes, excluding the newline.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Encode one message as a JSON line.
pub fn encode_line<T: Serialize>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}

/// Decode a stream of byte chunks into a stream of messages.
///
/// Lines longer than [`MAX_LINE_LENGTH`] are rejected.
pub fn decode_lines<T, S, B, E>(chunks: S) -> impl Stream<Item = Result<T, RpcError>>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<B, E>>,
    B: Buf,
    E: Display,
{
    decode_lines_with_max(chunks, MAX_LINE_LENGTH)
}

/// Decode a stream of byte chunks, rejecting lines longer than `max_line`.
///
/// Chunk boundaries need not line up with message boundaries. Blank lines
/// are skipped and a final line without a trailing newline is still decoded.
/// The stream ends after the first error: a chunk error yields
/// [`RpcError::Inbound`], an overlong line [`RpcError::LineTooLong`].
pub fn decode_lines_with_max<T, S, B, E>(
    chunks: S,
    max_line: usize,
) -> impl Stream<Item = Result<T, RpcError>>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<B, E>>,
    B: Buf,
    E: Display,
{
    let reader = StreamReader::new(
        chunks.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string())),
    );

    FramedRead::new(reader, LinesCodec::new_with_max_length(max_line))
        .try_filter(|line| future::ready(!line.trim().is_empty()))
        .map(move |line| match line {
            Ok(line) => serde_json::from_str(&line).map_err(RpcError::from),
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                Err(RpcError::LineTooLong(max_line))
            }
            Err(LinesCodecError::Io(e)) => Err(RpcError::inbound(e)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use bytes::Bytes;
    use futures::stream;
    use std::time::{Duration, Instant};

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
        let owned: Vec<_> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
            .collect();
        stream::iter(owned)
    }

    #[tokio::test]
    async fn test_decode_split_across_chunks() {
        let input = chunks(&[
            "{\"latitude\": 1, \"longi",
            "tude\": 2}\n{\"latitude\": 3,",
            " \"longitude\": 4}\n",
        ]);

        let points: Vec<Point> = decode_lines::<Point, _, _, _>(input)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(points, vec![Point::new(1, 2), Point::new(3, 4)]);
    }

    #[tokio::test]
    async fn test_decode_trailing_line_and_blank_lines() {
        let input = chunks(&["\n{\"latitude\": 1, \"longitude\": 2}\n\n", "{\"latitude\": 5}"]);

        let points: Vec<Point> = decode_lines::<Point, _, _, _>(input)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(points, vec![Point::new(1, 2), Point::new(5, 0)]);
    }

    #[tokio::test]
    async fn test_decode_empty_body() {
        let points: Vec<Point> = decode_lines::<Point, _, _, _>(chunks(&[]))
            .try_collect()
            .await
            .unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn test_decode_malformed_line() {
        let input = chunks(&["{\"latitude\": 1}\nnot json\n"]);
        let results: Vec<Result<Point, RpcError>> = decode_lines(input).collect().await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(RpcError::Decode(_))));
    }

    #[tokio::test]
    async fn test_decode_chunk_error_ends_stream() {
        let input = stream::iter(vec![
            Ok(Bytes::from_static(b"{\"latitude\": 1}\n{\"lat")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from_static(b"itude\": 2}\n")),
        ]);
        let results: Vec<Result<Point, RpcError>> = decode_lines(input).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &Point::new(1, 0));
        assert!(matches!(results[1], Err(RpcError::Inbound(_))));
    }

    #[tokio::test]
    async fn test_decode_rejects_overlong_line_fed_in_small_chunks() {
        // 8 MiB of one blank line without a newline, 1 KiB at a time.
        let chunk = Bytes::from(vec![b' '; 1024]);
        let input = stream::iter(
            std::iter::repeat(chunk)
                .take(8 * 1024)
                .map(Ok::<_, io::Error>),
        );

        let started = Instant::now();
        let results: Vec<Result<Point, RpcError>> = decode_lines(input).collect().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(RpcError::LineTooLong(MAX_LINE_LENGTH))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_decode_line_length_limit() {
        let line = format!("{{\"latitude\": 1}}{}", " ".repeat(16));
        let longer = format!("{} ", line);
        let max = line.len();
        let input = chunks(&[line.as_str(), "\n", longer.as_str()]);

        let results: Vec<Result<Point, RpcError>> =
            decode_lines_with_max(input, max).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &Point::new(1, 0));
        assert!(matches!(results[1], Err(RpcError::LineTooLong(_))));
    }

    #[test]
    fn test_encode_line_appends_newline() {
        let line = encode_line(&Point::new(1, 2)).unwrap();
        assert_eq!(line, b"{\"latitude\":1,\"longitude\":2}\n");
    }
}
