use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    /// When false the runner never calls out, even if a key is present.
    pub enabled: bool,
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    /// The key itself never lives in the config file.
    pub api_key_env: String,
    /// Rows sampled from each input table and from the gap list.
    pub sample_rows: usize,
    /// Role and skill names listed as "notable gaps".
    pub sample_names: usize,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-2.5-flash".into(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.into(),
            api_key_env: "API_KEY".into(),
            sample_rows: 3,
            sample_names: 5,
        }
    }
}

impl AdvisorSettings {
    /// Resolve the API key from the configured environment variable.
    /// Blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// A deficient gap at or above this size is a "major" gap.
    pub major_gap_threshold: f64,
    pub top_skill_chart_limit: usize,
    pub heatmap_skill_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            major_gap_threshold: 2.0,
            top_skill_chart_limit: 10,
            heatmap_skill_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub advisor: AdvisorSettings,
    pub reports: ReportSettings,
}

impl AnalysisConfig {
    /// Load from a JSON config file. Absent keys take their defaults.
    /// In tests, use AnalysisConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!("Loaded analysis config from {path}");
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// The advisor is disabled and reads a variable that is never set.
    pub fn default_test() -> Self {
        Self {
            advisor: AdvisorSettings {
                enabled: false,
                api_key_env: "SKILLGAP_TEST_UNSET_API_KEY".into(),
                ..AdvisorSettings::default()
            },
            reports: ReportSettings::default(),
        }
    }
}
