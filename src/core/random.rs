//! Word-based random string generation.
//!
//! Strings are built from a fixed dictionary of short English words, which
//! keeps them readable in file names and log lines.

use rand::seq::IndexedRandom;

/// Separator placed between words when none is given explicitly.
pub const DEFAULT_SEPARATOR: &str = "-";

/// The embedded word dictionary.
pub static WORDS: &[&str] = &[
    "acorn", "amber", "anchor", "apple", "arrow", "aspen", "atlas", "autumn",
    "badge", "bamboo", "basil", "beacon", "bell", "birch", "bison", "blossom",
    "bolt", "border", "bramble", "brass", "breeze", "brick", "bridge", "brook",
    "bucket", "butter", "cabin", "candle", "canyon", "carbon", "cedar", "chalk",
    "cherry", "cinder", "citrus", "clover", "cobalt", "comet", "copper", "coral",
    "cotton", "cradle", "crane", "crater", "cricket", "crystal", "daisy", "dawn",
    "delta", "dew", "drift", "dune", "dusk", "eagle", "echo", "ember",
    "falcon", "feather", "fern", "field", "finch", "flame", "flint", "forest",
    "fossil", "fox", "frost", "garden", "garnet", "ginger", "glacier", "glade",
    "granite", "grape", "grove", "harbor", "hazel", "heather", "heron", "hickory",
    "hill", "hollow", "honey", "horizon", "iris", "iron", "island", "ivory",
    "ivy", "jade", "jasper", "juniper", "kettle", "lagoon", "lantern", "larch",
    "lark", "laurel", "lava", "lemon", "lilac", "lily", "linen", "locust",
    "lotus", "lunar", "magnet", "maple", "marble", "meadow", "mesa", "mint",
    "mist", "morning", "moss", "mountain", "nectar", "nettle", "north", "nutmeg",
    "oak", "ocean", "olive", "onyx", "opal", "orchard", "osprey", "otter",
    "owl", "pebble", "pepper", "pine", "plume", "pond", "poplar", "poppy",
    "prairie", "quail", "quartz", "quill", "rain", "raven", "reed", "ridge",
    "river", "robin", "rowan", "ruby", "rust", "saffron", "sage", "salmon",
    "sand", "sapphire", "seal", "shadow", "shale", "shore", "silver", "sky",
    "slate", "smoke", "snow", "sorrel", "sparrow", "spruce", "star", "stone",
    "storm", "stream", "summit", "sunset", "swallow", "tansy", "teal", "thistle",
    "thorn", "thunder", "tide", "timber", "topaz", "trail", "tulip", "tundra",
    "valley", "velvet", "violet", "walnut", "wave", "wheat", "willow", "wind",
    "winter", "wolf", "wren", "yarrow", "yew", "zephyr", "zenith", "zinc",
];

/// Generates a random string made up of distinct dictionary words joined
/// by `separator`.
///
/// Requests for more segments than the dictionary holds return every word
/// once, in random order. Zero segments yield an empty string.
pub fn random_string(segments: usize, separator: &str) -> String {
    let mut rng = rand::rng();
    let words: Vec<&str> = WORDS.choose_multiple(&mut rng, segments).copied().collect();
    words.join(separator)
}
