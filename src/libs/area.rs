//! Area reference table.
//!
//! Areas are the physical or logical work locations a user can be "in". Each
//! carries an optional department charge code used for department totals.
//! The table is loaded once at startup from configuration and is read-only
//! afterwards. One extra reserved label, the idle pseudo-area, represents
//! "not assigned to any tracked area" and is never part of the ordered list.

use crate::libs::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Label of the idle pseudo-area unless configuration overrides it.
pub const DEFAULT_IDLE_LABEL: &str = "Untracked (Idle)";

/// Input that always selects the idle pseudo-area, whatever its label.
pub const IDLE_SHORTHAND: &str = "idle";

/// Areas and department codes shipped with the application.
pub const DEFAULT_AREAS: [(&str, &str); 10] = [
    ("Vigilance Focus Factory", "60011"),
    ("Enterprise Focus Factory", "60015"),
    ("Liberty Focus Factory", "60012"),
    ("Intrepid Focus Factory", "60013"),
    ("Freedom Focus Factory", "60017"),
    ("Pioneer Focus Factory", "60014"),
    ("ESS Chambers", "ESS"),
    ("Breaks", "NPRD"),
    ("Training", "TRAIN"),
    ("E3 Projects", "NPRD"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDefinition {
    /// 1-based position in the table; only used for display order.
    pub ordinal: usize,
    pub display_name: String,
    pub department_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AreaTable {
    areas: Vec<AreaDefinition>,
    idle_label: String,
}

impl AreaTable {
    /// Builds a table from `(name, department_code)` pairs in display order.
    ///
    /// Names must be unique ignoring ASCII case, must not collide with the
    /// idle label and must not be the `idle` shorthand, since [`resolve`](Self::resolve)
    /// matches names case-insensitively.
    /// Empty department codes are stored as `None`.
    pub fn new<I, N, D>(areas: I, idle_label: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Option<D>)>,
        N: Into<String>,
        D: Into<String>,
    {
        let idle_label = idle_label.into();
        let mut seen = HashSet::new();
        seen.insert(idle_label.to_ascii_lowercase());

        let mut table = Vec::new();
        for (index, (name, code)) in areas.into_iter().enumerate() {
            let display_name: String = name.into();
            if display_name.trim().eq_ignore_ascii_case(IDLE_SHORTHAND) {
                return Err(TrackerError::ReservedArea(display_name));
            }
            if !seen.insert(display_name.to_ascii_lowercase()) {
                return Err(TrackerError::DuplicateArea(display_name));
            }
            let department_code = code.map(Into::into).filter(|c: &String| !c.trim().is_empty());
            table.push(AreaDefinition {
                ordinal: index + 1,
                display_name,
                department_code,
            });
        }

        Ok(Self { areas: table, idle_label })
    }

    pub fn idle_label(&self) -> &str {
        &self.idle_label
    }

    pub fn areas(&self) -> &[AreaDefinition] {
        &self.areas
    }

    pub fn is_idle(&self, name: &str) -> bool {
        name == self.idle_label
    }

    pub fn get(&self, name: &str) -> Option<&AreaDefinition> {
        self.areas.iter().find(|a| a.display_name == name)
    }

    /// Department code for an area name; `None` for the idle label and unknown areas.
    pub fn department_code(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|a| a.department_code.as_deref())
    }

    /// Resolves user input to a canonical area name.
    ///
    /// Accepts an ordinal (`"9"`), a display name compared case-insensitively,
    /// the idle label, or the shorthand `idle`.
    pub fn resolve(&self, input: &str) -> Result<String> {
        let input = input.trim();

        if input.eq_ignore_ascii_case(IDLE_SHORTHAND) || input.eq_ignore_ascii_case(&self.idle_label) {
            return Ok(self.idle_label.clone());
        }

        if let Ok(ordinal) = input.parse::<usize>() {
            if let Some(area) = self.areas.iter().find(|a| a.ordinal == ordinal) {
                return Ok(area.display_name.clone());
            }
        }

        self.areas
            .iter()
            .find(|a| a.display_name.eq_ignore_ascii_case(input))
            .map(|a| a.display_name.clone())
            .ok_or_else(|| TrackerError::UnknownArea(input.to_string()))
    }
}

impl Default for AreaTable {
    fn default() -> Self {
        Self {
            areas: DEFAULT_AREAS
                .iter()
                .enumerate()
                .map(|(index, (name, code))| AreaDefinition {
                    ordinal: index + 1,
                    display_name: name.to_string(),
                    department_code: Some(code.to_string()),
                })
                .collect(),
            idle_label: DEFAULT_IDLE_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_ten_areas() {
        let table = AreaTable::default();
        assert_eq!(table.areas().len(), 10);
        assert_eq!(table.areas()[0].ordinal, 1);
        assert_eq!(table.department_code("Training"), Some("TRAIN"));
        assert_eq!(table.department_code(DEFAULT_IDLE_LABEL), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = AreaTable::new(vec![("A", Some("1")), ("A", Some("2"))], DEFAULT_IDLE_LABEL);
        assert!(matches!(result, Err(TrackerError::DuplicateArea(name)) if name == "A"));

        let result = AreaTable::new(vec![("Off Site", None::<&str>)], "Off Site");
        assert!(matches!(result, Err(TrackerError::DuplicateArea(_))));
    }

    #[test]
    fn names_differing_only_in_case_are_rejected() {
        let result = AreaTable::new(vec![("Lab", Some("1")), ("LAB", Some("2"))], DEFAULT_IDLE_LABEL);
        assert!(matches!(result, Err(TrackerError::DuplicateArea(name)) if name == "LAB"));

        let result = AreaTable::new(vec![("untracked (idle)", None::<&str>)], DEFAULT_IDLE_LABEL);
        assert!(matches!(result, Err(TrackerError::DuplicateArea(_))));
    }

    #[test]
    fn idle_shorthand_is_reserved() {
        for name in ["idle", "IDLE", " Idle "] {
            let result = AreaTable::new(vec![("Lab", None::<&str>), (name, None)], DEFAULT_IDLE_LABEL);
            assert!(matches!(result, Err(TrackerError::ReservedArea(n)) if n == name));
        }

        // Every accepted name stays reachable through resolve.
        let table = AreaTable::new(vec![("Lab", None::<&str>), ("Idle Bay", None)], DEFAULT_IDLE_LABEL).unwrap();
        assert_eq!(table.resolve("lab").unwrap(), "Lab");
        assert_eq!(table.resolve("idle bay").unwrap(), "Idle Bay");
        assert_eq!(table.resolve("idle").unwrap(), DEFAULT_IDLE_LABEL);
    }

    #[test]
    fn blank_department_code_becomes_none() {
        let table = AreaTable::new(vec![("Lab", Some("  "))], DEFAULT_IDLE_LABEL).unwrap();
        assert_eq!(table.department_code("Lab"), None);
    }

    #[test]
    fn resolve_accepts_ordinals_names_and_idle() {
        let table = AreaTable::default();
        assert_eq!(table.resolve("9").unwrap(), "Training");
        assert_eq!(table.resolve("ess chambers").unwrap(), "ESS Chambers");
        assert_eq!(table.resolve("idle").unwrap(), DEFAULT_IDLE_LABEL);
        assert!(matches!(table.resolve("Moon Base"), Err(TrackerError::UnknownArea(_))));
        assert!(table.resolve("42").is_err());
    }
}
