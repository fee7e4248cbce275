use std::collections::HashMap;

use crate::models::ThemeVisual;

const DEFAULT_ICON: &str = "📚";
const DEFAULT_COLOR: &str = "#95a5a6";

/// Icon and colour per theme tag, with a fallback for unknown themes
#[derive(Debug, Clone)]
pub struct ThemeVisuals {
    visuals: HashMap<String, ThemeVisual>,
    fallback: ThemeVisual,
}

impl Default for ThemeVisuals {
    fn default() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(theme, icon, color)| (theme.to_string(), visual(icon, color)))
                .collect(),
        )
    }
}

impl ThemeVisuals {
    /// Creates a lookup from an explicit mapping
    pub fn new(visuals: HashMap<String, ThemeVisual>) -> Self {
        Self {
            visuals,
            fallback: visual(DEFAULT_ICON, DEFAULT_COLOR),
        }
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, theme: &str) -> &ThemeVisual {
        self.visuals.get(theme).unwrap_or(&self.fallback)
    }
}

fn visual(icon: &str, color: &str) -> ThemeVisual {
    ThemeVisual {
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

const BUILTIN: &[(&str, &str, &str)] = &[
    ("surveillance", "👁️", "#e74c3c"),
    ("totalitarianism", "⚔️", "#c0392b"),
    ("thought-control", "🧠", "#8e44ad"),
    ("propaganda", "📢", "#d35400"),
    ("genetic-engineering", "🧬", "#27ae60"),
    ("social-control", "🎭", "#2980b9"),
    ("consumerism", "🛒", "#f39c12"),
    ("conditioning", "🔗", "#7f8c8d"),
    ("censorship", "🚫", "#e67e22"),
    ("anti-intellectualism", "📖", "#95a5a6"),
    ("media-control", "📺", "#34495e"),
    ("conformity", "👥", "#7f8c8d"),
    ("theocracy", "⛪", "#8e44ad"),
    ("gender-oppression", "⚥", "#e74c3c"),
    ("reproduction-control", "👶", "#c0392b"),
    ("resistance", "✊", "#e74c3c"),
    ("cyberpunk", "🌃", "#9b59b6"),
    ("AI", "🤖", "#3498db"),
    ("virtual-reality", "🥽", "#1abc9c"),
    ("corporate-power", "🏢", "#34495e"),
    ("post-apocalyptic", "☢️", "#95a5a6"),
    ("survival", "🔥", "#e67e22"),
    ("climate-change", "🌡️", "#27ae60"),
    ("pandemic", "🦠", "#e74c3c"),
    ("rebellion", "⚡", "#f39c12"),
    ("class-divide", "⚖️", "#95a5a6"),
    ("privacy", "🔒", "#3498db"),
    ("identity", "🎭", "#9b59b6"),
    ("revolution", "🔥", "#e74c3c"),
    ("mutation", "🧬", "#16a085"),
    ("technology", "⚙️", "#34495e"),
    ("empathy", "💜", "#9b59b6"),
    ("religion", "🕊️", "#3498db"),
    ("memory", "💭", "#8e44ad"),
    ("politics", "🏛️", "#2c3e50"),
    ("war", "⚔️", "#c0392b"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_complete() {
        assert_eq!(BUILTIN.len(), 36);
        let visuals = ThemeVisuals::default();
        for (theme, icon, _) in BUILTIN {
            assert_eq!(visuals.lookup(theme).icon, *icon);
        }
    }

    #[test]
    fn test_known_theme() {
        let visuals = ThemeVisuals::default();
        let found = visuals.lookup("surveillance");
        assert_eq!(found.icon, "👁️");
        assert_eq!(found.color, "#e74c3c");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let visuals = ThemeVisuals::default();
        assert_eq!(visuals.lookup("gardening"), &visual("📚", "#95a5a6"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let visuals = ThemeVisuals::default();
        assert_eq!(visuals.lookup("AI").icon, "🤖");
        assert_eq!(visuals.lookup("ai").icon, DEFAULT_ICON);
    }

    #[test]
    fn test_custom_mapping() {
        let mut map = HashMap::new();
        map.insert("heists".to_string(), visual("💰", "#000000"));
        let visuals = ThemeVisuals::new(map);
        assert_eq!(visuals.lookup("heists").icon, "💰");
        assert_eq!(visuals.lookup("war").icon, DEFAULT_ICON);
    }
}
