//! Static style and aspect-ratio catalogs with autocomplete filtering.

/// Every Fooocus style the bot accepts.
pub const FOOOCUS_STYLES: &[&str] = &[
    "cinematic-default",
    "sai-3d-model",
    "sai-analog film",
    "sai-anime",
    "sai-cinematic",
    "sai-comic book",
    "sai-craft clay",
    "sai-digital art",
    "sai-enhance",
    "sai-fantasy art",
    "sai-isometric",
    "sai-line art",
    "sai-lowpoly",
    "sai-neonpunk",
    "sai-origami",
    "sai-photographic",
    "sai-pixel art",
    "sai-texture",
    "ads-advertising",
    "ads-automotive",
    "ads-corporate",
    "ads-fashion editorial",
    "ads-food photography",
    "ads-luxury",
    "ads-real estate",
    "ads-retail",
    "artstyle-abstract",
    "artstyle-abstract expressionism",
    "artstyle-art deco",
    "artstyle-art nouveau",
    "artstyle-constructivist",
    "artstyle-cubist",
    "artstyle-expressionist",
    "artstyle-graffiti",
    "artstyle-hyperrealism",
    "artstyle-impressionist",
    "artstyle-pointillism",
    "artstyle-pop art",
    "artstyle-psychedelic",
    "artstyle-renaissance",
    "artstyle-steampunk",
    "artstyle-surrealist",
    "artstyle-typography",
    "artstyle-watercolor",
    "futuristic-biomechanical",
    "futuristic-cybernetic",
    "futuristic-cyberpunk",
    "futuristic-retro futurism",
    "futuristic-sci-fi",
    "futuristic-vaporwave",
    "game-bubble bobble",
    "game-cyberpunk game",
    "game-fighting game",
    "game-gta",
    "game-mario",
    "game-minecraft",
    "game-pokemon",
    "game-retro arcade",
    "game-retro game",
    "game-rpg fantasy game",
    "game-strategy game",
    "game-streetfighter",
    "game-zelda",
    "photo-alien",
    "photo-film noir",
    "photo-hdr",
    "photo-long exposure",
    "photo-neon noir",
    "photo-silhouette",
    "photo-tilt-shift",
];

/// Aspect ratios supported by the model, as `WIDTHxHEIGHT`.
pub const FOOOCUS_ASPECT_RATIOS: &[&str] = &[
    "704x1408", "704x1344", "768x1344", "768x1280", "832x1216", "832x1152", "896x1152",
    "896x1088", "960x1088", "960x1024", "1024x1024", "1024x960", "1088x960", "1088x896",
    "1152x896", "1152x832", "1216x832", "1280x768", "1344x768", "1344x704", "1408x704",
    "1472x704", "1536x640", "1600x640", "1664x576", "1728x576",
];

/// Number of styles offered by the regenerate picker (one slot of the
/// host's 25-option limit is taken by [`KEEP_STYLE`]).
pub const DEFAULT_STYLE_COUNT: usize = 24;

/// Picker value meaning "regenerate with the style already used".
pub const KEEP_STYLE: &str = "keep";

/// Most options an autocomplete response may carry.
pub const MAX_AUTOCOMPLETE_OPTIONS: usize = 25;

/// Styles offered by the regenerate picker.
pub fn default_styles() -> &'static [&'static str] {
    &FOOOCUS_STYLES[..DEFAULT_STYLE_COUNT.min(FOOOCUS_STYLES.len())]
}

/// Human label for a style value: `"sai-comic book"` -> `"Sai Comic Book"`.
pub fn style_label(style: &str) -> String {
    style
        .split(['-', ' '])
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Filter `options` for an autocomplete prompt.
///
/// An empty query returns the first [`MAX_AUTOCOMPLETE_OPTIONS`] options;
/// otherwise every option containing `current` (case-insensitively).
pub fn autocomplete<'a>(options: &[&'a str], current: &str) -> Vec<&'a str> {
    if current.is_empty() {
        return options.iter().take(MAX_AUTOCOMPLETE_OPTIONS).copied().collect();
    }

    let needle = current.to_lowercase();
    options
        .iter()
        .filter(|option| option.to_lowercase().contains(&needle))
        .copied()
        .collect()
}
