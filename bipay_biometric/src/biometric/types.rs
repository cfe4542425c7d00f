use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Origin of a template. Only `Demo` is produced without a hardware sensor.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Real,
    Demo,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Real => "real",
            TemplateType::Demo => "demo",
        }
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device the template was enrolled on. Informational only.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub platform: String,
    pub user_agent: String,
}

/// A stored enrollment.
///
/// Timestamps are milliseconds since the Unix epoch. `template_data` is kept
/// exactly as given at enrollment; it is never validated.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BiometricTemplate {
    pub id: String,
    pub user_id: String,
    pub template_data: String,
    pub device_info: DeviceInfo,
    pub enrollment_timestamp: i64,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub quality_score: f64,
    pub last_used: i64,
    pub usage_count: u64,
}

/// Aggregate view returned by [`crate::BiometricDatabase::get_stats`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BiometricStats {
    pub total_templates: usize,
    pub real_templates: usize,
    pub demo_templates: usize,
    pub total_users: usize,
    pub avg_quality: f64,
}

/// On-disk layout: arrays of `[key, value]` pairs in insertion order.
#[derive(Serialize, Deserialize, Debug, Default)]
pub(super) struct DatabaseSnapshot {
    #[serde(default)]
    pub(super) templates: Vec<(String, BiometricTemplate)>,
    #[serde(default, rename = "userTemplates")]
    pub(super) user_templates: Vec<(String, Vec<String>)>,
}

/// Insertion-ordered template map plus the user -> template ids index.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct TemplateTable {
    templates: Vec<(String, BiometricTemplate)>,
    positions: HashMap<String, usize>,
    users: Vec<(String, Vec<String>)>,
    user_positions: HashMap<String, usize>,
}

impl TemplateTable {
    /// Insert or replace a template keyed by `key`. A replaced entry keeps its position.
    pub(super) fn insert(&mut self, key: String, template: BiometricTemplate) {
        match self.positions.get(&key) {
            Some(&pos) => self.templates[pos].1 = template,
            None => {
                self.positions.insert(key.clone(), self.templates.len());
                self.templates.push((key, template));
            }
        }
    }

    pub(super) fn get(&self, id: &str) -> Option<&BiometricTemplate> {
        let pos = *self.positions.get(id)?;
        self.templates.get(pos).map(|(_, template)| template)
    }

    pub(super) fn get_mut(&mut self, id: &str) -> Option<&mut BiometricTemplate> {
        let pos = *self.positions.get(id)?;
        self.templates.get_mut(pos).map(|(_, template)| template)
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (&str, &BiometricTemplate)> {
        self.templates
            .iter()
            .map(|(key, template)| (key.as_str(), template))
    }

    pub(super) fn len(&self) -> usize {
        self.templates.len()
    }

    /// Append `template_id` to the user's list, creating the list if absent.
    pub(super) fn push_user_template(&mut self, user_id: &str, template_id: String) {
        match self.user_positions.get(user_id) {
            Some(&pos) => self.users[pos].1.push(template_id),
            None => {
                self.user_positions
                    .insert(user_id.to_string(), self.users.len());
                self.users.push((user_id.to_string(), vec![template_id]));
            }
        }
    }

    fn set_user_templates(&mut self, user_id: String, ids: Vec<String>) {
        match self.user_positions.get(&user_id) {
            Some(&pos) => self.users[pos].1 = ids,
            None => {
                self.user_positions.insert(user_id.clone(), self.users.len());
                self.users.push((user_id, ids));
            }
        }
    }

    pub(super) fn user_template_ids(&self, user_id: &str) -> &[String] {
        self.user_positions
            .get(user_id)
            .map(|&pos| self.users[pos].1.as_slice())
            .unwrap_or(&[])
    }

    pub(super) fn user_count(&self) -> usize {
        self.users.len()
    }

    pub(super) fn to_snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            templates: self.templates.clone(),
            user_templates: self.users.clone(),
        }
    }

    pub(super) fn from_snapshot(snapshot: DatabaseSnapshot) -> Self {
        let mut table = Self::default();
        for (key, template) in snapshot.templates {
            table.insert(key, template);
        }
        for (user_id, ids) in snapshot.user_templates {
            table.set_user_templates(user_id, ids);
        }
        table
    }
}
