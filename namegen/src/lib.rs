//! Challenging-filename corpus for upload QA.
//!
//! The corpus is a finite, ordered, deterministic sequence of filenames that
//! are known to trip up remote-storage tooling: shell metacharacters,
//! whitespace in awkward positions, Unicode in several scripts and
//! normalization forms, Windows-reserved device names, and names at the
//! 255-byte component limit.
//!
//! Every name is prefixed with a three-digit zero-padded ordinal
//! (`001-`, `002-`, ...) so runs can address individual names by number, and
//! every name is a valid single POSIX path component: no `/`, no NUL, at
//! most [`NAME_MAX`] bytes.

/// Maximum length in bytes of a single filename component on most POSIX
/// filesystems.
pub const NAME_MAX: usize = 255;

/// Bytes taken by the `NNN-` ordinal prefix.
const PREFIX_LEN: usize = 4;

/// Hand-picked payloads; the length extremes are built programmatically in
/// [`payloads`] so the ordinal prefix still fits within [`NAME_MAX`].
const BASE_PAYLOADS: &[&str] = &[
    "plain-ascii.txt",
    "name with spaces.txt",
    " leading-space.txt",
    "trailing-space.txt ",
    "double  space.txt",
    "tab\tseparated.txt",
    "single'quote.txt",
    "double\"quote.txt",
    "back`tick.txt",
    "dollar$sign.txt",
    "ampersand&name.txt",
    "semicolon;name.txt",
    "pipe|name.txt",
    "redirect<name>.txt",
    "glob*star.txt",
    "question?mark.txt",
    "bracket[name].txt",
    "brace{name}.txt",
    "paren(name).txt",
    "caret^name.txt",
    "exclaim!name.txt",
    "tilde~name.txt",
    "hash#name.txt",
    "percent%name.txt",
    "percent%20encoded.txt",
    "equals=name.txt",
    "plus+name.txt",
    "comma,name.txt",
    "at@name.txt",
    "colon:name.txt",
    "back\\slash.txt",
    "-leading-dash.txt",
    "--double-dash.txt",
    ".hidden-name.txt",
    "..almost-dotdot.txt",
    "ends.with.dot.",
    "many....dots....txt",
    "no-extension",
    "UPPER-lower-Mixed.TXT",
    "upper-lower-mixed.txt",
    "CON",
    "NUL.txt",
    "COM1.txt",
    "café-émigré-nfc.txt",
    "cafe\u{301}-e\u{301}migre\u{301}-nfd.txt",
    "naïve-piñata.txt",
    "日本語ファイル名.txt",
    "中文文件名.txt",
    "한국어파일이름.txt",
    "שלום-עולם.txt",
    "مرحبا-بالعالم.txt",
    "Ελληνικά.txt",
    "русский-файл.txt",
    "🚀-rocket.txt",
    "🎉🎊-party.txt",
    "family-👨\u{200d}👩\u{200d}👧\u{200d}👦.txt",
    "ＦＵＬＬ-ｗｉｄｔｈ.txt",
    "zero\u{200b}width.txt",
    "a\u{301}\u{302}\u{303}-stacked-marks.txt",
];

fn payloads() -> Vec<String> {
    let mut payloads: Vec<String> = BASE_PAYLOADS.iter().map(|s| (*s).to_string()).collect();
    // a name at exactly NAME_MAX bytes once the ordinal prefix is added
    payloads.push("x".repeat(NAME_MAX - PREFIX_LEN));
    // multi-byte characters close to the limit without splitting a code point
    payloads.push("あ".repeat((NAME_MAX - PREFIX_LEN) / 'あ'.len_utf8()));
    payloads
}

/// The finite, ordered corpus of challenging filenames.
///
/// Lazily yields `NNN-<payload>` names, front to back; the sequence is the
/// same on every call.
pub fn name_permutations() -> impl Iterator<Item = String> {
    payloads()
        .into_iter()
        .enumerate()
        .map(|(idx, payload)| format!("{:03}-{}", idx + 1, payload))
}
