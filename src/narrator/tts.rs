//! Speech synthesis of the narration script.
//!
//! The TTS endpoint only accepts short inputs, so the script is first split
//! into chunks of at most [`MAX_CHUNK_CHARS`] characters, preferring sentence
//! boundaries, then whitespace, then a hard character split for unbroken
//! runs. Chunks are synthesized strictly in order and the MP3 payloads are
//! concatenated into one playable file.

use crate::narrator::remote::{RemoteCall, RetryCall, SpeechCall, BASE_DELAY, MAX_RETRIES};
use std::error::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Upper bound the TTS endpoint accepts per request, in characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Sentence pieces (ending in danda, period, question or exclamation mark,
/// or a newline) are kept whole when they fit, joined with single spaces.
/// An oversized sentence falls back to word packing; a single run longer
/// than `max_chars` is cut mid-run. Counts are characters, not bytes, since
/// the script is Devanagari.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for piece in text.split_inclusive(|c: char| matches!(c, '।' | '.' | '!' | '?' | '\n')) {
        let sentence = piece.trim();
        if sentence.is_empty() {
            continue;
        }
        if sentence.chars().count() <= max_chars {
            pack(&mut chunks, &mut current, sentence, max_chars);
            continue;
        }
        for word in sentence.split_whitespace() {
            if word.chars().count() <= max_chars {
                pack(&mut chunks, &mut current, word, max_chars);
            } else {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                let run: Vec<char> = word.chars().collect();
                for slice in run.chunks(max_chars) {
                    if slice.len() == max_chars {
                        chunks.push(slice.iter().collect());
                    } else {
                        current = slice.iter().collect();
                    }
                }
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Append a fragment that is known to fit in one chunk, flushing first when
/// the running chunk has no room left.
fn pack(chunks: &mut Vec<String>, current: &mut String, fragment: &str, max_chars: usize) {
    if current.is_empty() {
        current.push_str(fragment);
        return;
    }
    if current.chars().count() + 1 + fragment.chars().count() <= max_chars {
        current.push(' ');
        current.push_str(fragment);
    } else {
        chunks.push(std::mem::take(current));
        current.push_str(fragment);
    }
}

/// Synthesize a script and write the concatenated MP3 to `path`.
///
/// Chunks are fetched one at a time; MPEG audio frames are self-contained,
/// so appending the payloads yields a valid stream. Any chunk failing after
/// retries fails the whole narration.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn synthesize_to_file(
    client: &reqwest::Client,
    endpoint: &str,
    lang: &str,
    script: &str,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let chunks = chunk_text(script, MAX_CHUNK_CHARS);
    if chunks.is_empty() {
        return Err("narration script is empty".into());
    }

    let speech = SpeechCall {
        client,
        endpoint,
        lang,
    };
    let api = RetryCall::new(speech, MAX_RETRIES, BASE_DELAY);

    let mut audio: Vec<u8> = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let bytes = api.call(chunk).await?;
        debug!(
            chunk = i + 1,
            total = chunks.len(),
            bytes = bytes.len(),
            "Synthesized narration chunk"
        );
        audio.extend_from_slice(&bytes);
    }

    fs::write(path, &audio).await?;
    info!(
        chunks = chunks.len(),
        bytes = audio.len(),
        "Wrote narration audio"
    );
    Ok(())
}
