use deunicode::deunicode_char;

/// Turns a display name into a lower-case slug with words joined by dashes,
/// transliterating non-ASCII characters where possible.
pub fn slugify_kebab(str: &str) -> String {
    let mut slug = String::with_capacity(str.len());

    let mut pending_dash = false;
    let mut add_char = |c: char| match c {
        'a'..='z' | 'A'..='Z' | '0'..='9' => {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        }

        _ => pending_dash = true,
    };

    for char in str.chars() {
        if char.is_ascii() {
            add_char(char);
        } else if let Some(deunicoded) = deunicode_char(char) {
            deunicoded.chars().for_each(&mut add_char);
        }
    }

    slug.shrink_to_fit();
    slug
}
