/// An emphasis word bound to the beat it lands on.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BeatAlignment {
    pub word: String,
    pub frame: i64,
}

/// Pair the i-th emphasis word with the i-th beat, stopping at the shorter list.
///
/// Words past the last beat are left unbound and render without beat emphasis. Beats past the
/// last word are left unconsumed.
pub fn align<S: AsRef<str>>(words: &[S], beats: &[i64]) -> Vec<BeatAlignment> {
    words
        .iter()
        .zip(beats)
        .map(|(word, &frame)| BeatAlignment {
            word: word.as_ref().to_string(),
            frame,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/beat/align.rs"]
mod tests;
