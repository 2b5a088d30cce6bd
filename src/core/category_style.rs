use crate::core::models::category::{CategoryStyle, StyledCategory};

/// Keyword fragments checked in order against the lower-cased name.
const KEYWORD_STYLES: [(&[&str], &str, &str); 18] = [
    (&["grocer"], "shopping-cart", "emerald-500"),
    (&["produce", "fruit", "veg"], "leaf", "green-500"),
    (&["dairy", "milk"], "droplet", "cyan-500"),
    (&["meat", "beef", "chic"], "flame", "red-500"),
    (&["bakery", "bread"], "cake", "orange-400"),
    (&["pantry", "canned"], "package", "amber-500"),
    (&["frozen", "ice"], "snowflake", "blue-400"),
    (&["beverage", "drink", "coffee"], "coffee", "teal-500"),
    (&["snack", "chip"], "cookie", "orange-500"),
    (&["household", "clean"], "home", "indigo-500"),
    (&["health", "pharm"], "heart", "rose-500"),
    (&["personal", "care"], "sparkles", "purple-500"),
    (&["cloth", "apparel"], "shirt", "pink-500"),
    (&["dining", "eat", "restaurant"], "utensils", "orange-600"),
    (&["util", "electric"], "zap", "yellow-500"),
    (&["retail", "shop"], "shopping-bag", "blue-600"),
    (&["kid", "baby", "toy"], "baby", "sky-500"),
    (&["other", "misc"], "tag", "slate-400"),
];

const HASH_COLORS: [&str; 6] = [
    "indigo-500",
    "pink-500",
    "violet-500",
    "fuchsia-500",
    "cyan-500",
    "emerald-500",
];

const HASH_ICONS: [&str; 8] = [
    "star",
    "hexagon",
    "circle",
    "square",
    "dna",
    "briefcase",
    "gamepad-2",
    "layout-grid",
];

fn style(icon: &str, color: &str) -> CategoryStyle {
    CategoryStyle {
        icon: icon.to_string(),
        color: format!("text-{}", color),
        bg: format!("bg-{}", color),
    }
}

/// `hash = c + ((hash << 5) - hash)` over UTF-16 code units, where the
/// shift operates on the 32-bit truncation of the running value.
pub fn category_hash(name: &str) -> i64 {
    name.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        (unit as i64).wrapping_add(shifted.wrapping_sub(hash))
    })
}

/// Deterministic icon and colour for a category name.
pub fn category_style(name: &str) -> CategoryStyle {
    let lowered = name.trim().to_lowercase();
    if let Some((_, icon, color)) = KEYWORD_STYLES
        .iter()
        .find(|(keywords, _, _)| keywords.iter().any(|k| lowered.contains(k)))
    {
        return style(icon, color);
    }

    let hash = category_hash(name).unsigned_abs();
    let color = HASH_COLORS[(hash % HASH_COLORS.len() as u64) as usize];
    let icon = HASH_ICONS[(hash % HASH_ICONS.len() as u64) as usize];
    style(icon, color)
}

pub fn styled(names: Vec<String>) -> Vec<StyledCategory> {
    names
        .into_iter()
        .map(|name| StyledCategory {
            style: category_style(&name),
            name,
        })
        .collect()
}
