//! Cosmetic skins and board themes bought with coins.
//!
//! Colors are lists of gradient stops as space-separated hex values;
//! a renderer can split them and build whatever gradient it likes.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSkin {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub head_color: &'static str,
    pub body_color: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub background_color: &'static str,
    pub grid_color: &'static str,
    pub food_color: &'static str,
    pub unlocked: bool,
}

pub fn create_skins() -> Vec<SnakeSkin> {
    let skin = |id, name, price, head_color, body_color, unlocked| SnakeSkin {
        id,
        name,
        price,
        head_color,
        body_color,
        unlocked,
    };
    vec![
        skin(
            "default",
            "Classic Green",
            0,
            "#34d399 #059669",
            "#6ee7b7 #10b981",
            true,
        ),
        skin(
            "fire",
            "Fire Snake",
            50,
            "#f87171 #dc2626",
            "#fb923c #ef4444",
            false,
        ),
        skin(
            "ice",
            "Ice Snake",
            75,
            "#22d3ee #2563eb",
            "#93c5fd #06b6d4",
            false,
        ),
        skin(
            "shadow",
            "Shadow Snake",
            100,
            "#374151 #000000",
            "#4b5563 #1f2937",
            false,
        ),
        skin(
            "golden",
            "Golden Snake",
            150,
            "#facc15 #f97316",
            "#fde047 #eab308",
            false,
        ),
        skin(
            "rainbow",
            "Rainbow Snake",
            200,
            "#f472b6 #a855f7 #4f46e5",
            "#c084fc #ec4899",
            false,
        ),
        skin(
            "neon",
            "Neon Snake",
            125,
            "#a3e635 #22c55e",
            "#bef264 #84cc16",
            false,
        ),
        skin(
            "royal",
            "Royal Snake",
            175,
            "#9333ea #4338ca",
            "#c084fc #9333ea",
            false,
        ),
    ]
}

pub fn create_themes() -> Vec<GameTheme> {
    let theme = |id, name, price, background_color, grid_color, food_color, unlocked| GameTheme {
        id,
        name,
        price,
        background_color,
        grid_color,
        food_color,
        unlocked,
    };
    vec![
        theme(
            "classic",
            "Classic",
            0,
            "#f3f4f6 #e5e7eb",
            "#d1d5db",
            "#f87171 #dc2626",
            true,
        ),
        theme(
            "retro",
            "Retro Arcade",
            100,
            "#000000",
            "#22c55e",
            "#4ade80 #16a34a",
            false,
        ),
        theme(
            "neon",
            "Neon City",
            150,
            "#581c87 #831843",
            "#22d3ee",
            "#22d3ee #3b82f6",
            false,
        ),
        theme(
            "forest",
            "Forest",
            125,
            "#166534 #14532d",
            "#16a34a",
            "#ef4444 #b91c1c",
            false,
        ),
        theme(
            "space",
            "Space",
            200,
            "#312e81 #581c87 #000000",
            "#60a5fa",
            "#facc15 #f97316",
            false,
        ),
        theme(
            "ocean",
            "Ocean Depths",
            175,
            "#1e3a8a #1e40af",
            "#60a5fa",
            "#fb923c #ef4444",
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cosmetics_start_unlocked() {
        let skins = create_skins();
        let themes = create_themes();
        assert_eq!(skins.len(), 8);
        assert_eq!(themes.len(), 6);
        assert!(skins.iter().filter(|s| s.unlocked).all(|s| s.id == "default"));
        assert!(
            themes
                .iter()
                .filter(|t| t.unlocked)
                .all(|t| t.id == "classic")
        );
        assert_eq!(skins.iter().find(|s| s.id == "default").unwrap().price, 0);
        assert_eq!(themes.iter().find(|t| t.id == "classic").unwrap().price, 0);
    }
}
