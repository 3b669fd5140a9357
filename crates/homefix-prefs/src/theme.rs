//! Dark-mode design tokens and the style rules registered for the mode flag.

/// A single color token with a stable name and hex value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorToken {
    /// Semantic identifier for the token (e.g., "surface").
    pub name: &'static str,
    /// Hex RGB value for the token.
    pub hex: &'static str,
}

/// Collection of related tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Palette identifier, used as the custom property prefix.
    pub id: &'static str,
    /// Ordered list of tokens.
    pub tokens: &'static [ColorToken],
}

/// Surfaces, borders and text colors applied while dark mode is on.
pub const DARK: Palette = Palette {
    id: "dark",
    tokens: &[
        ColorToken {
            name: "background",
            hex: "#12161C",
        },
        ColorToken {
            name: "surface",
            hex: "#1B2129",
        },
        ColorToken {
            name: "surface-raised",
            hex: "#232B35",
        },
        ColorToken {
            name: "border",
            hex: "#334050",
        },
        ColorToken {
            name: "text-primary",
            hex: "#EEF2F6",
        },
        ColorToken {
            name: "text-secondary",
            hex: "#B9C3CF",
        },
        ColorToken {
            name: "text-muted",
            hex: "#8391A2",
        },
        ColorToken {
            name: "accent",
            hex: "#3DA5F4",
        },
    ],
};

/// Element selectors that pick up the surface tokens.
const SURFACE_SELECTORS: [&str; 4] = ["card", "modal", "dropdown", "navbar"];

/// Style rules scoped to the root element carrying `flag` as a class.
///
/// Custom properties are declared on the flagged element so nested
/// components inherit them without further registration.
#[must_use]
pub fn dark_mode_rules(flag: &str) -> String {
    let prefix = DARK.id;
    let mut lines = vec![format!(".{flag} {{")];
    lines.extend(
        DARK.tokens
            .iter()
            .map(|token| format!("  --hf-{prefix}-{}: {};", token.name, token.hex)),
    );
    lines.push(format!("  background-color: var(--hf-{prefix}-background);"));
    lines.push(format!("  color: var(--hf-{prefix}-text-primary);"));
    lines.push("  color-scheme: dark;".to_string());
    lines.push("}".to_string());
    lines.extend(SURFACE_SELECTORS.iter().map(|selector| {
        format!(
            ".{flag} .{selector} {{ background-color: var(--hf-{prefix}-surface); border-color: var(--hf-{prefix}-border); }}"
        )
    }));
    lines.push(format!(
        ".{flag} input, .{flag} select, .{flag} textarea {{ background-color: var(--hf-{prefix}-surface-raised); color: var(--hf-{prefix}-text-primary); }}"
    ));
    lines.push(format!(".{flag} a {{ color: var(--hf-{prefix}-accent); }}"));

    let mut css = lines.join("\n");
    css.push('\n');
    css
}
