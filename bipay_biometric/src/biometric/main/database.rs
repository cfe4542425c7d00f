use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use crate::biometric::types::{
    BiometricStats, BiometricTemplate, DatabaseSnapshot, DeviceInfo, TemplateTable, TemplateType,
};
use crate::config::BiometricConfig;
use crate::storage::SharedKeyValueStore;
use crate::utils::{gen_timestamped_id, now_millis};

use super::generator::generate_template;
use super::matcher::{calculate_similarity, extract_pattern};

/// Template store backed by a key-value backend.
///
/// The whole template map and the user index are written back as one JSON
/// document on every mutation. All operations are serialized behind a single
/// lock, so a call observes the effects of every call that finished before it.
/// Nothing guards against another process writing the same key.
pub struct BiometricDatabase {
    backend: SharedKeyValueStore,
    state: Mutex<DatabaseState>,
    config: BiometricConfig,
}

struct DatabaseState {
    table: TemplateTable,
    rng: StdRng,
}

impl BiometricDatabase {
    /// Open the store and load any existing snapshot, using an entropy-seeded rng.
    pub async fn open(backend: SharedKeyValueStore, config: BiometricConfig) -> Self {
        Self::open_with_rng(backend, config, StdRng::from_entropy()).await
    }

    /// Open the store with an explicit rng; pass a seeded one for reproducible runs.
    pub async fn open_with_rng(
        backend: SharedKeyValueStore,
        config: BiometricConfig,
        rng: StdRng,
    ) -> Self {
        if let Err(e) = backend.lock().await.init().await {
            tracing::error!("Failed to initialize biometric storage backend: {}", e);
        }

        let db = Self {
            backend,
            state: Mutex::new(DatabaseState {
                table: TemplateTable::default(),
                rng,
            }),
            config,
        };
        db.reload().await;
        db
    }

    /// Replace the in-memory state with what the backend currently holds.
    ///
    /// A missing key yields an empty store; an unreadable or corrupt snapshot
    /// is logged and also yields an empty store.
    ///
    /// Holds the state lock across the read so no concurrent mutation is lost.
    pub async fn reload(&self) {
        let mut state = self.state.lock().await;
        let table = self.load_table().await;
        tracing::info!(
            "Loaded biometric database: {} templates, {} users",
            table.len(),
            table.user_count()
        );
        state.table = table;
    }

    pub fn config(&self) -> &BiometricConfig {
        &self.config
    }

    pub(crate) fn backend(&self) -> SharedKeyValueStore {
        self.backend.clone()
    }

    /// Run `f` with the store's rng.
    pub(crate) async fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut state = self.state.lock().await;
        f(&mut state.rng)
    }

    /// Store a new template for `user_id` and return its id.
    ///
    /// Never fails: a backend write error is logged and the enrollment stays
    /// in memory only.
    pub async fn enroll(
        &self,
        user_id: &str,
        template_data: &str,
        template_type: TemplateType,
    ) -> String {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let now = now_millis();
        let template_id = gen_timestamped_id("tpl", now, &mut state.rng);
        let device_id = self.device_id(&mut state.rng).await;
        let quality_score = quality_score(template_type, &mut state.rng);

        let template = BiometricTemplate {
            id: template_id.clone(),
            user_id: user_id.to_string(),
            template_data: template_data.to_string(),
            device_info: DeviceInfo {
                device_id,
                platform: self.config.platform.clone(),
                user_agent: self.config.user_agent.clone(),
            },
            enrollment_timestamp: now,
            template_type,
            quality_score,
            last_used: now,
            usage_count: 0,
        };

        state.table.insert(template_id.clone(), template);
        state.table.push_user_template(user_id, template_id.clone());

        self.save(&state.table).await;

        tracing::info!(
            "Biometric enrolled for user {}: template_id={}, type={}, quality_score={:.2}",
            user_id,
            template_id,
            template_type,
            quality_score
        );

        template_id
    }

    /// Find the owner of the first stored template whose pattern is similar
    /// enough to the one in `biometric_data`.
    ///
    /// Templates are scanned in enrollment order and the first one reaching
    /// its type's threshold wins. A match bumps `last_used` and `usage_count`
    /// and persists the store. `None` means no template matched.
    pub async fn authenticate(&self, biometric_data: &str) -> Option<String> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        tracing::debug!("Searching for user by biometric data");
        let input_pattern = extract_pattern(biometric_data);

        let mut matched = None;
        for (template_id, template) in state.table.iter() {
            let stored_pattern = extract_pattern(&template.template_data);
            let similarity = calculate_similarity(&input_pattern, &stored_pattern, &mut state.rng);
            let threshold = self.threshold(template.template_type);

            tracing::debug!(
                "Comparing with template {}: similarity {:.3} (threshold {:.2})",
                template_id,
                similarity,
                threshold
            );

            if similarity >= threshold {
                matched = Some(template_id.to_string());
                break;
            }
        }

        let Some(template_id) = matched else {
            tracing::info!("No biometric match found");
            return None;
        };

        let template = state.table.get_mut(&template_id)?;
        template.last_used = now_millis();
        template.usage_count += 1;
        let user_id = template.user_id.clone();

        self.save(&state.table).await;

        tracing::info!(
            "Biometric match found: user={}, template_id={}",
            user_id,
            template_id
        );
        Some(user_id)
    }

    /// Generate a synthetic template for this installation's device.
    ///
    /// May create and store the device id; the template itself is not stored.
    pub async fn generate_template(&self, template_type: TemplateType) -> String {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let device_id = self.device_id(&mut state.rng).await;
        generate_template(template_type, &device_id, now_millis(), &mut state.rng)
    }

    /// Templates owned by `user_id` in enrollment order.
    pub async fn get_user_templates(&self, user_id: &str) -> Vec<BiometricTemplate> {
        let state = self.state.lock().await;
        state
            .table
            .user_template_ids(user_id)
            .iter()
            .filter_map(|id| state.table.get(id))
            .cloned()
            .collect()
    }

    pub async fn has_user_enrolled(&self, user_id: &str) -> bool {
        !self.get_user_templates(user_id).await.is_empty()
    }

    pub async fn get_stats(&self) -> BiometricStats {
        let state = self.state.lock().await;
        let total_templates = state.table.len();
        let real_templates = state
            .table
            .iter()
            .filter(|(_, t)| t.template_type == TemplateType::Real)
            .count();
        let avg_quality = if total_templates > 0 {
            state
                .table
                .iter()
                .map(|(_, t)| t.quality_score)
                .sum::<f64>()
                / total_templates as f64
        } else {
            0.0
        };

        BiometricStats {
            total_templates,
            real_templates,
            demo_templates: total_templates - real_templates,
            total_users: state.table.user_count(),
            avg_quality,
        }
    }

    fn threshold(&self, template_type: TemplateType) -> f64 {
        match template_type {
            TemplateType::Real => self.config.real_threshold,
            TemplateType::Demo => self.config.demo_threshold,
        }
    }

    /// Stable per-installation id, created on first use as `dev_<millis>_<random>`.
    async fn device_id(&self, rng: &mut StdRng) -> String {
        let key = self.config.device_id_key.as_str();
        let mut backend = self.backend.lock().await;

        match backend.get(key).await {
            Ok(Some(device_id)) => return device_id,
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to read device id: {}", e),
        }

        let device_id = gen_timestamped_id("dev", now_millis(), rng);
        if let Err(e) = backend.set(key, device_id.clone()).await {
            tracing::error!("Failed to store device id: {}", e);
        }
        tracing::debug!("Created device id {}", device_id);
        device_id
    }

    async fn load_table(&self) -> TemplateTable {
        let raw = self.backend.lock().await.get(&self.config.db_key).await;

        match raw {
            Ok(Some(json)) => match serde_json::from_str::<DatabaseSnapshot>(&json) {
                Ok(snapshot) => TemplateTable::from_snapshot(snapshot),
                Err(e) => {
                    tracing::warn!("Failed to load biometric database: {}", e);
                    TemplateTable::default()
                }
            },
            Ok(None) => TemplateTable::default(),
            Err(e) => {
                tracing::error!("Failed to load biometric database: {}", e);
                TemplateTable::default()
            }
        }
    }

    async fn save(&self, table: &TemplateTable) {
        let json = match serde_json::to_string(&table.to_snapshot()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize biometric database: {}", e);
                return;
            }
        };

        let mut backend = self.backend.lock().await;
        if let Err(e) = backend.set(&self.config.db_key, json).await {
            tracing::error!("Failed to save biometric database: {}", e);
        }
    }
}

/// Random score in `[85, 100)` for real templates and `[70, 90)` for demo ones.
fn quality_score<R: Rng + ?Sized>(template_type: TemplateType, rng: &mut R) -> f64 {
    match template_type {
        TemplateType::Real => rng.gen_range(85.0..100.0),
        TemplateType::Demo => rng.gen_range(70.0..90.0),
    }
}
