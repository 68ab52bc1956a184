//! 运行参数。字段都有默认值，TOML/JSON 里只需写要覆盖的部分。
use serde::Deserialize;
use web_time::Duration;

use crate::{matcher::MAX_CANDIDATES, trigger::TriggerDetector};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 触发字符
    pub marker: char,
    /// 候选数量（1..=8）；超出范围时回退到 8
    pub max_candidates: u8,
    /// 一次插入完成后的冷却时间，吸收宿主编辑器自身的重渲染
    pub cooldown_ms: u64,
    /// overlay 单行高度（px），用于估算列表高度
    pub row_height: f64,
    /// overlay 与 surface 之间的间距（px）
    pub overlay_gap: f64,
    /// 剪贴板回退后状态提示的显示时长
    pub status_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: ':',
            max_candidates: MAX_CANDIDATES as u8,
            cooldown_ms: 50,
            row_height: 28.0,
            overlay_gap: 4.0,
            status_duration_ms: 2000,
        }
    }
}

impl Config {
    pub fn candidate_limit(&self) -> usize {
        let n = usize::from(self.max_candidates);
        if (1..=MAX_CANDIDATES).contains(&n) { n } else { MAX_CANDIDATES }
    }

    pub fn detector(&self) -> TriggerDetector {
        TriggerDetector::new(self.marker)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status_duration_ms)
    }
}
