use crate::city::CityAliases;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub city_aliases: CityAliases,

    #[serde(default = "default_sentinel_phrases")]
    pub sentinel_phrases: Vec<String>,

    #[serde(default = "default_report_limit")]
    pub report_limit: usize,
}

fn default_sentinel_phrases() -> Vec<String> {
    vec!["дату доставки нет".to_string(), "доставки нет".to_string()]
}
fn default_report_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            city_aliases: CityAliases::default(),
            sentinel_phrases: default_sentinel_phrases(),
            report_limit: 10,
        }
    }
}
