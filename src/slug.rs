//! Title to slug conversion with Russian transliteration.

/// Maximum slug length, matching the `notes.slug` column.
pub const SLUG_MAX_LENGTH: usize = 100;

/// Transliterates a single lowercase character. `None` means the character is
/// kept as is (and later dropped if it is not `[-a-z0-9]`).
fn translit(c: char) -> Option<&'static str> {
    let out = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian letters commonly found in Russian-language titles.
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        '–' | '—' | '‒' | '−' => "-",
        _ => return None,
    };
    Some(out)
}

/// slugify
///
/// Lowercases `input` and turns `&` into `and`. Every run of whitespace and
/// `-` then becomes a single `-`, before anything is dropped, so a separator
/// next to a removed symbol survives (`"Кто я ?"` gives `"kto-ya-"`). Finally
/// Cyrillic is transliterated and anything outside `[-a-z0-9]` is removed.
/// The result is not truncated; see [`derive_slug`].
pub fn slugify(input: &str) -> String {
    let lowered = input
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut out = String::with_capacity(lowered.len());
    let mut in_separator = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;
        match translit(c) {
            Some(piece) => out.push_str(piece),
            None if c.is_ascii_alphanumeric() => out.push(c),
            None => {}
        }
    }
    out
}

/// Slug used for a note saved without one: the slugified title, cut to
/// [`SLUG_MAX_LENGTH`] characters.
pub fn derive_slug(title: &str) -> String {
    slugify(title).chars().take(SLUG_MAX_LENGTH).collect()
}

/// Whether `slug` is acceptable as a user-provided slug.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
