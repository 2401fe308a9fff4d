use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Symbolic icon reference. The presentation layer decides what it looks like.
///
/// Names are matched case-insensitively; unknown names become [`PresetIcon::Sparkles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PresetIcon {
    Zap,
    Coffee,
    Bed,
    Egg,
    Dumbbell,
    Code,
    /// Fallback for anything the presentation layer has no glyph for.
    Sparkles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreset {
    pub id: String,
    pub name: String,
    pub duration_secs: u64,
    #[serde(default = "default_icon")]
    pub icon: PresetIcon,
    /// Style tag, e.g. `text-orange-500`.
    #[serde(default)]
    pub color: String,
}

impl From<String> for PresetIcon {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "zap" => PresetIcon::Zap,
            "coffee" => PresetIcon::Coffee,
            "bed" => PresetIcon::Bed,
            "egg" => PresetIcon::Egg,
            "dumbbell" => PresetIcon::Dumbbell,
            "code" => PresetIcon::Code,
            _ => PresetIcon::Sparkles,
        }
    }
}

fn default_icon() -> PresetIcon {
    PresetIcon::Sparkles
}

impl TimerPreset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_secs: u64,
        icon: PresetIcon,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_secs,
            icon,
            color: color.into(),
        }
    }

    /// Duration in milliseconds, saturating on absurd values.
    pub fn duration_ms(&self) -> u64 {
        self.duration_secs.saturating_mul(1000)
    }

    /// Whole minutes, as shown on the dashboard.
    pub fn duration_min(&self) -> u64 {
        self.duration_secs / 60
    }

    pub fn is_startable(&self) -> bool {
        self.duration_secs > 0
    }
}

/// Ordered, id-unique list of presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTable {
    presets: Vec<TimerPreset>,
}

impl PresetTable {
    /// Build a table, rejecting empty lists, duplicate ids and zero durations.
    pub fn new(presets: Vec<TimerPreset>) -> Result<Self, ValidationError> {
        if presets.is_empty() {
            return Err(ValidationError::EmptyCollection("presets".into()));
        }

        let mut seen = HashSet::new();
        for preset in &presets {
            if preset.id.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "id".into(),
                    message: format!("preset '{}' has an empty id", preset.name),
                });
            }
            if !preset.is_startable() {
                return Err(ValidationError::InvalidValue {
                    field: "duration_secs".into(),
                    message: format!("preset '{}' must last at least one second", preset.id),
                });
            }
            if !seen.insert(preset.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    collection: "presets".into(),
                    id: preset.id.clone(),
                });
            }
        }

        Ok(Self { presets })
    }

    /// The built-in widget set.
    pub fn default_presets() -> Self {
        Self {
            presets: vec![
                TimerPreset::new("1", "Focus", 25 * 60, PresetIcon::Zap, "text-orange-500"),
                TimerPreset::new("2", "Short Break", 5 * 60, PresetIcon::Coffee, "text-blue-400"),
                TimerPreset::new("3", "Nap", 20 * 60, PresetIcon::Bed, "text-purple-400"),
                TimerPreset::new("4", "Soft Boiled", 6 * 60, PresetIcon::Egg, "text-yellow-400"),
                TimerPreset::new("5", "Workout", 45 * 60, PresetIcon::Dumbbell, "text-red-500"),
                TimerPreset::new("6", "Sprint", 15 * 60, PresetIcon::Code, "text-green-400"),
            ],
        }
    }

    pub fn find(&self, id: &str) -> Option<&TimerPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimerPreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn as_slice(&self) -> &[TimerPreset] {
        &self.presets
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::default_presets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_6_presets() {
        let t = PresetTable::default();
        assert_eq!(t.len(), 6);
        assert_eq!(t.find("1").unwrap().name, "Focus");
        assert_eq!(t.find("1").unwrap().duration_secs, 1500);
    }

    #[test]
    fn default_table_passes_validation() {
        let t = PresetTable::default();
        assert!(PresetTable::new(t.as_slice().to_vec()).is_ok());
    }

    #[test]
    fn find_unknown_id_is_none() {
        assert!(PresetTable::default().find("99").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = PresetTable::new(vec![
            TimerPreset::new("a", "One", 60, PresetIcon::Zap, ""),
            TimerPreset::new("a", "Two", 60, PresetIcon::Zap, ""),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateId {
                collection: "presets".into(),
                id: "a".into()
            }
        );
    }

    #[test]
    fn rejects_zero_duration() {
        let result = PresetTable::new(vec![TimerPreset::new("a", "Zero", 0, PresetIcon::Egg, "")]);
        assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            PresetTable::new(Vec::new()),
            Err(ValidationError::EmptyCollection(_))
        ));
    }

    #[test]
    fn icon_defaults_to_sparkles_when_missing() {
        let p: TimerPreset =
            serde_json::from_str(r#"{"id":"x","name":"Tea","duration_secs":180}"#).unwrap();
        assert_eq!(p.icon, PresetIcon::Sparkles);
        assert_eq!(p.duration_min(), 3);
    }

    #[test]
    fn icon_names_are_case_insensitive_with_sparkles_fallback() {
        let icons: Vec<PresetIcon> =
            serde_json::from_str(r#"["Zap","COFFEE","egg","Star",""]"#).unwrap();
        assert_eq!(
            icons,
            vec![
                PresetIcon::Zap,
                PresetIcon::Coffee,
                PresetIcon::Egg,
                PresetIcon::Sparkles,
                PresetIcon::Sparkles,
            ]
        );
        assert_eq!(serde_json::to_string(&PresetIcon::Dumbbell).unwrap(), r#""dumbbell""#);
    }
}
