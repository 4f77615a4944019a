//! Rule-driven SKU generation.

use super::overrides::SkuOverrides;
use super::rules::{SkuRule, strip_lr_suffix};
use super::template::{clean_hyphens, render};

/// Maps `(code, description, context)` to an SKU with one rule set.
///
/// Generation is a pure function of its inputs and the borrowed rules.
#[derive(Debug, Clone, Copy)]
pub struct SkuEngine<'a> {
    rules: &'a [SkuRule],
}

impl<'a> SkuEngine<'a> {
    pub fn new(rules: &'a [SkuRule]) -> Self {
        Self { rules }
    }

    /// First matching rule, else the keyword fallbacks. Never empty.
    pub fn generate(&self, code: &str, description: &str, context: &str) -> String {
        self.apply_rules(code, description, context)
            .unwrap_or_else(|| fallback_sku(code, description, context))
    }

    /// SKU from the first enabled rule that matches and renders.
    pub fn apply_rules(&self, code: &str, description: &str, context: &str) -> Option<String> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled && rule.matches_description(description))
            .find_map(|rule| {
                let code = rule.preprocess(code);
                let sku = render_rule(rule, &code, context)?;
                tracing::debug!("rule {} matched {:?}: {}", rule.id, description, sku);
                Some(sku)
            })
    }
}

fn render_rule(rule: &SkuRule, code: &str, context: &str) -> Option<String> {
    let values = [
        ("user_code", code),
        ("occw_code", code),
        ("door_color", context),
    ];

    let rendered = match render(&rule.format_template, &values) {
        Ok(sku) => sku,
        Err(err) => {
            tracing::warn!("rule {}: {}", rule.id, err);
            let fallback = rule.fallback.as_deref()?;
            match render(fallback, &values) {
                Ok(sku) => sku,
                Err(err) => {
                    tracing::warn!("rule {} fallback: {}, skipping rule", rule.id, err);
                    return None;
                }
            }
        }
    };

    let sku = clean_hyphens(&rendered);
    (!sku.is_empty()).then_some(sku)
}

/// Keyword heuristics used when no rule matches.
///
/// Checked in order against the upper-cased description; cabinet, door and
/// assembly codes lose their `-L` / `-R` hand marker.
pub fn fallback_sku(code: &str, description: &str, context: &str) -> String {
    let text = description.to_uppercase();
    let has = |keyword: &str| text.contains(keyword);
    let plain = strip_lr_suffix(code);

    if has("CABINET") || has("BOX") {
        format!("{plain}-PLY-{context}")
    } else if has("DOOR") {
        format!("{plain}-DOOR-{context}")
    } else if has("HARDWARE") || has("HW") {
        format!("HW-{code}")
    } else if has("MOLDING") {
        format!("{context}-MOLD-{code}")
    } else if has("TOE KICK") {
        format!("{context}-TK-{code}")
    } else if has("FILLER") {
        format!("{context}-FILL-{code}")
    } else if has("ENDING PANEL") || has("END PANEL") {
        format!("{context}-EP-{code}")
    } else if has("RTA ASSM") || has("ASSEMBLY") {
        format!("{plain}-ASSM-{context}")
    } else {
        format!("{context}-{code}")
    }
}

/// [`SkuEngine`] followed by the override table.
#[derive(Debug, Clone, Copy)]
pub struct SkuResolver<'a> {
    engine: SkuEngine<'a>,
    overrides: &'a SkuOverrides,
}

impl<'a> SkuResolver<'a> {
    pub fn new(rules: &'a [SkuRule], overrides: &'a SkuOverrides) -> Self {
        Self {
            engine: SkuEngine::new(rules),
            overrides,
        }
    }

    pub fn engine(&self) -> SkuEngine<'a> {
        self.engine
    }

    /// Final SKU for a record.
    pub fn resolve(&self, code: &str, description: &str, context: &str) -> String {
        let generated = self.engine.generate(code, description, context);
        self.overrides.apply(&generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fallback_table() {
        let cases = [
            ("B30-L", "Base Cabinet", "B30-PLY-BSS"),
            ("W3030", "Wall Box", "W3030-PLY-BSS"),
            ("WD30-R", "Wall Door", "WD30-DOOR-BSS"),
            ("KNOB1", "Hardware Knob", "HW-KNOB1"),
            ("CM8", "Crown Molding", "BSS-MOLD-CM8"),
            ("TK8", "Toe Kick 8ft", "BSS-TK-TK8"),
            ("F3", "Filler 3in", "BSS-FILL-F3"),
            ("EP24", "Ending Panel", "BSS-EP-EP24"),
            ("SB36-L", "RTA Assm.", "SB36-ASSM-BSS"),
            ("WF330 FOR", "Base Accessory", "BSS-WF330 FOR"),
        ];

        for (code, description, expected) in cases {
            assert_eq!(fallback_sku(code, description, "BSS"), expected, "{description}");
        }
    }

    #[test]
    fn test_no_context_still_yields_sku() {
        assert_eq!(fallback_sku("X1", "Widget", "N/A"), "N/A-X1");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            SkuRule::new("off", "*", "OFF-{user_code}").disabled(),
            SkuRule::new("wall", "wall", "{door_color}-W-{user_code}")
                .with_preprocessing("strip_lr_suffix"),
            SkuRule::new("any", "*", "ANY-{user_code}"),
        ];
        let engine = SkuEngine::new(&rules);

        assert_eq!(engine.generate("W3030-L", "Wall Cabinet", "BSS"), "BSS-W-W3030");
        assert_eq!(engine.generate("B30", "Base Cabinet", "BSS"), "ANY-B30");
    }

    #[test]
    fn test_rule_fallback_template() {
        let rules = vec![
            SkuRule::new("finish", "base", "{user_code}-{finish}")
                .with_fallback("{occw_code}-BASE"),
            SkuRule::new("broken", "wall", "{finish}"),
        ];
        let engine = SkuEngine::new(&rules);

        assert_eq!(engine.generate("B30", "Base Cabinet", "BSS"), "B30-BASE");
        // Unrenderable rule without a fallback does not match
        assert_eq!(engine.generate("W3030", "Wall Cabinet", "BSS"), "W3030-PLY-BSS");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let rules = vec![SkuRule::new("wall", "wall", "{user_code}-{door_color}")];
        let engine = SkuEngine::new(&rules);
        let first = engine.generate("W3030", "Wall", "MNW");
        assert_eq!(engine.generate("W3030", "Wall", "MNW"), first);
    }

    #[test]
    fn test_resolver_applies_overrides() {
        let overrides: SkuOverrides = [("B30-PLY-BSS", "B30-BSS-SPECIAL")].into_iter().collect();
        let resolver = SkuResolver::new(&[], &overrides);

        assert_eq!(resolver.resolve("B30", "Base Cabinet", "BSS"), "B30-BSS-SPECIAL");
        assert_eq!(resolver.resolve("B36", "Base Cabinet", "BSS"), "B36-PLY-BSS");
    }
}
