//! Track metadata cleanup before lookup.
//!
//! Raw titles coming from players are often file names ("01 - Song.mp3"),
//! carry rip annotations ("Song [320kbps]") or soundtrack markers
//! ("Theme OST"). The lyrics database matches on exact-ish strings, so
//! these are stripped here along with user-configured filter patterns.
//!
//! Every cleanup step only removes text, and the pipeline is re-applied
//! until the value stops changing. That makes [`normalize`] idempotent.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::domain::{InvalidTrackError, RawTrack, Track};

/// Audio/video containers a title may have been derived from.
const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "oga", "opus", "m4a", "m4b", "m4p", "mp4", "aac", "wav", "wave", "wma",
    "aiff", "aif", "aifc", "ape", "alac", "wv", "mpc", "tta", "mka", "mkv", "webm", "weba", "mov",
    "avi", "dsf", "dff",
];

static MEDIA_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)\.(?:{})$", MEDIA_EXTENSIONS.join("|"));
    Regex::new(&pattern).expect("media extension pattern is valid")
});

/// Any short extension on the last path segment ("Song.xyz")
static ANY_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[A-Za-z][A-Za-z0-9]{0,4}$").expect("extension pattern is valid")
});

/// Rooted Unix or Windows path
static ROOTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[/\\]|[A-Za-z]:[/\\])").expect("path pattern is valid"));

static BITRATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s\-_]*[(\[]?\s*\d+\s*kbps\s*[)\]]?").expect("bitrate pattern is valid")
});

static OST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s\-_]*[(\[]?\s*\bOST\b\s*[)\]]?").expect("OST pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// User-configured patterns removed from each field.
///
/// Each entry is a regex fragment matched case-insensitively. Entries that
/// are not valid regexes are matched as literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFilters {
    pub title: Vec<String>,
    pub artist: Vec<String>,
    pub album: Vec<String>,
}

impl TextFilters {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty() && self.album.is_empty()
    }
}

/// Compile one filter list, skipping blanks
fn compile_filters(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter(|p| !p.trim().is_empty())
        .filter_map(|p| {
            let compiled = RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .or_else(|_| {
                    tracing::debug!("Filter {:?} is not a regex, matching literally", p);
                    RegexBuilder::new(&regex::escape(p))
                        .case_insensitive(true)
                        .build()
                });
            match compiled {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Ignoring unusable filter {:?}: {}", p, e);
                    None
                }
            }
        })
        .collect()
}

fn remove_all(input: &str, filters: &[Regex]) -> String {
    filters.iter().fold(input.to_string(), |acc, re| {
        re.replace_all(&acc, "").into_owned()
    })
}

fn tidy(input: &str) -> String {
    WHITESPACE
        .replace_all(input, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .to_string()
}

/// Drop directories and the extension when the title names a file.
///
/// A title counts as a file when it ends in a media extension, is a rooted
/// path, or has directories and an extension. "AC/DC" is none of these.
fn strip_file_name(input: &str) -> String {
    let name = input.rsplit(['/', '\\']).next().unwrap_or(input);
    if MEDIA_EXTENSION.is_match(input) {
        return MEDIA_EXTENSION.replace(name, "").into_owned();
    }
    let has_dirs = name.len() < input.len();
    if ROOTED_PATH.is_match(input) || (has_dirs && ANY_EXTENSION.is_match(name)) {
        return ANY_EXTENSION.replace(name, "").into_owned();
    }
    input.to_string()
}

fn clean_title_once(input: &str, filters: &[Regex]) -> String {
    let name = strip_file_name(input);
    let filtered = remove_all(&name, filters);
    let no_bitrate = BITRATE.replace_all(&filtered, " ");
    let no_ost = OST_MARKER.replace_all(&no_bitrate, " ");
    tidy(&no_ost)
}

fn clean_field_once(input: &str, filters: &[Regex]) -> String {
    tidy(&remove_all(input, filters))
}

/// Apply a cleanup step until it reaches a fixpoint.
fn settle(input: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = step(input);
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Clean raw track metadata into a [`Track`].
///
/// Fails only when the title is empty after cleanup; callers must not
/// retry that.
pub fn normalize(
    raw_title: &str,
    raw_artist: Option<&str>,
    raw_album: Option<&str>,
    filters: &TextFilters,
) -> Result<Track, InvalidTrackError> {
    let title_filters = compile_filters(&filters.title);
    let artist_filters = compile_filters(&filters.artist);
    let album_filters = compile_filters(&filters.album);

    let title = settle(raw_title, |s| clean_title_once(s, &title_filters));
    if title.is_empty() {
        return Err(InvalidTrackError::empty_title(raw_title));
    }

    let artist = raw_artist
        .map(|a| settle(a, |s| clean_field_once(s, &artist_filters)))
        .and_then(non_empty);
    let album = raw_album
        .map(|a| settle(a, |s| clean_field_once(s, &album_filters)))
        .and_then(non_empty);

    Ok(Track {
        title,
        artist,
        album,
        duration_secs: None,
        external_id: None,
    })
}

impl RawTrack {
    /// Normalize the text fields and carry duration and correlation handle over.
    pub fn normalize(&self, filters: &TextFilters) -> Result<Track, InvalidTrackError> {
        let track = normalize(
            &self.title,
            self.artist.as_deref(),
            self.album.as_deref(),
            filters,
        )?;
        Ok(Track {
            duration_secs: self.duration_secs.filter(|d| *d > 0),
            external_id: self.external_id.clone(),
            ..track
        })
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Words that survive cleanup on their own
    fn title_base() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z]{2,10}( [A-Za-z]{2,10}){0,3}")
            .unwrap()
            .prop_filter("no OST word", |s| {
                !s.split(' ').any(|w| w.eq_ignore_ascii_case("ost"))
            })
    }

    fn extension() -> impl Strategy<Value = String> {
        prop::sample::select(MEDIA_EXTENSIONS).prop_map(|e| e.to_string())
    }

    fn bitrate_marker() -> impl Strategy<Value = String> {
        (1u32..1000, prop::sample::select(vec![" ", " - ", "_", " [", " ("]))
            .prop_map(|(kbps, sep)| {
                let close = match sep {
                    " [" => "]",
                    " (" => ")",
                    _ => "",
                };
                format!("{sep}{kbps}kbps{close}")
            })
    }

    /// Arbitrary messy input, including path separators and brackets
    fn messy_title() -> impl Strategy<Value = String> {
        prop::string::string_regex(r"[a-zA-Z0-9 ._/()\[\]\-]{0,40}").unwrap()
    }

    proptest! {
        /// Extension and bitrate markers never survive normalization
        #[test]
        fn normalize_removes_extension_and_bitrate(
            base in title_base(),
            marker in proptest::option::of(bitrate_marker()),
            ext in proptest::option::of(extension()),
        ) {
            let mut raw = base.clone();
            if let Some(marker) = &marker {
                raw.push_str(marker);
            }
            if let Some(ext) = &ext {
                raw.push('.');
                raw.push_str(ext);
            }

            let track = normalize(&raw, None, None, &TextFilters::default()).unwrap();
            prop_assert!(
                !MEDIA_EXTENSION.is_match(&track.title),
                "extension left in {:?}",
                track.title
            );
            prop_assert!(!BITRATE.is_match(&track.title), "bitrate left in {:?}", track.title);
            prop_assert_eq!(track.title, base);
        }

        /// Normalizing an already-normalized track changes nothing
        #[test]
        fn normalize_is_idempotent(
            title in messy_title(),
            artist in proptest::option::of(messy_title()),
            album in proptest::option::of(messy_title()),
        ) {
            let filters = TextFilters {
                title: vec![r"\(live.*\)".to_string(), "remaster".to_string()],
                artist: vec!["ab".to_string()],
                album: vec!["[deluxe".to_string()],
            };
            if let Ok(first) = normalize(&title, artist.as_deref(), album.as_deref(), &filters) {
                let second = normalize(
                    &first.title,
                    first.artist.as_deref(),
                    first.album.as_deref(),
                    &filters,
                ).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
