use indexmap::IndexMap;
use serde::Deserialize;

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("питер", "Санкт-Петербург"),
    ("петербург", "Санкт-Петербург"),
    ("спб", "Санкт-Петербург"),
    ("нн", "Нижний Новгород"),
    ("нижний", "Нижний Новгород"),
    ("челны", "Набережные Челны"),
    ("набережные челны", "Набережные Челны"),
    ("йошкар-ола", "Йошкар-Ола"),
    ("орёл", "Орёл"),
];

/// Ordered alias → canonical city table.
///
/// Order matters: the substring fallback in [`normalize_city`] returns the
/// first entry that matches. Keys are stored lowercased.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "IndexMap<String, String>")]
pub struct CityAliases {
    entries: IndexMap<String, String>,
}

impl CityAliases {
    pub fn new() -> Self {
        CityAliases {
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.entries
            .insert(alias.trim().to_lowercase(), canonical.trim().to_string());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CityAliases {
    fn default() -> Self {
        let mut aliases = CityAliases::new();
        for (alias, canonical) in DEFAULT_ALIASES {
            aliases.insert(alias, canonical);
        }
        aliases
    }
}

impl From<IndexMap<String, String>> for CityAliases {
    fn from(map: IndexMap<String, String>) -> Self {
        let mut aliases = CityAliases::new();
        for (alias, canonical) in &map {
            aliases.insert(alias, canonical);
        }
        aliases
    }
}

/// Map a city as typed to its canonical name.
///
/// Exact alias match first, then the first alias that contains or is
/// contained in the input. Unknown cities get only their first letter
/// capitalized, so "нижний новгород" style multi-word names lose inner
/// capitals.
pub fn normalize_city(city: &str, aliases: &CityAliases) -> String {
    let lower = city.trim().to_lowercase();

    if let Some(canonical) = aliases.get(&lower) {
        return canonical.to_string();
    }

    for (alias, canonical) in aliases.iter() {
        if lower.contains(alias) || alias.contains(lower.as_str()) {
            return canonical.to_string();
        }
    }

    capitalize_first(city)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => {
            let rest = chars.as_str().to_lowercase();
            c.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
