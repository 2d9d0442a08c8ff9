//! Display helpers for the signed-in user's profile.

/// Avatar initials: the first letter of each word of the full name, else the
/// first character of the email, else `"U"`.
#[must_use]
pub fn initials(full_name: Option<&str>, email: &str) -> String {
    if let Some(name) = full_name {
        let letters: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if !letters.is_empty() {
            return letters;
        }
    }

    email
        .trim()
        .chars()
        .next()
        .map_or_else(|| "U".to_owned(), |c| c.to_uppercase().collect())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
