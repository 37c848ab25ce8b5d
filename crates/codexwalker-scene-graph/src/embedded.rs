//! The dataset compiled into the binary.

/// Chapter files in play order, as `(file name, contents)`.
pub const CHAPTERS: [(&str, &str); 4] = [
    ("act1.json", include_str!("../data/act1.json")),
    ("act2.json", include_str!("../data/act2.json")),
    ("act3.json", include_str!("../data/act3.json")),
    ("act4.json", include_str!("../data/act4.json")),
];

/// The lore file, as `(file name, contents)`.
pub const LORE: (&str, &str) = ("codex.json", include_str!("../data/codex.json"));
