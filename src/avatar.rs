//! Placeholder avatars for users without a loadable picture.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Background colors, picked by the code point of the name's first character.
pub const PALETTE: [&str; 5] = ["#F44336", "#3F51B5", "#009688", "#FF9800", "#9C27B0"];

/// Width and height of the generated image in pixels.
pub const AVATAR_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub letter: String,
    pub color: &'static str,
}

impl Avatar {
    /// Build the avatar for a display name. Same name, same avatar.
    pub fn for_name(name: &str) -> Self {
        let first = name.trim().chars().next();
        let letter = first
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string());
        Self {
            letter,
            color: PALETTE[color_index(name)],
        }
    }

    pub fn to_svg(&self) -> String {
        let size = AVATAR_SIZE;
        let half = size / 2;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
                r#"<rect width="{size}" height="{size}" fill="{color}"/>"#,
                r#"<text x="{half}" y="{half}" dominant-baseline="central" text-anchor="middle" "#,
                r##"fill="#FFFFFF" font-family="Arial, sans-serif" font-weight="bold" font-size="{font}">{letter}</text>"##,
                "</svg>"
            ),
            size = size,
            half = half,
            font = half,
            color = self.color,
            letter = escape_xml(&self.letter),
        )
    }

    /// The SVG as a `data:` URI usable wherever an image URL is expected.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(self.to_svg()))
    }
}

/// Palette index for a name: first character's code point modulo the palette size.
pub fn color_index(name: &str) -> usize {
    name.trim()
        .chars()
        .next()
        .map_or(0, |c| c as usize % PALETTE.len())
}

/// Return `picture` if it loads, otherwise the generated avatar for `name`.
///
/// A picture "loads" when a GET for it succeeds with a 2xx status.
pub async fn resolve_avatar(client: &reqwest::Client, picture: Option<&str>, name: &str) -> String {
    let Some(url) = picture.map(str::trim).filter(|url| !url.is_empty()) else {
        return Avatar::for_name(name).to_data_uri();
    };

    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => url.to_string(),
        Ok(response) => {
            tracing::warn!(url, status = %response.status(), "avatar failed to load, using fallback");
            Avatar::for_name(name).to_data_uri()
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "avatar failed to load, using fallback");
            Avatar::for_name(name).to_data_uri()
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
