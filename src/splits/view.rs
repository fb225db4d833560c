//! Read-only snapshots handed to renderers and persistence

use serde::Serialize;
use std::time::Duration;

use crate::Result;

/// Display data for one split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitView {
    pub name: String,
    /// Resource key of the split's image
    pub image: String,
    pub current: String,
    pub best: String,
    pub average: String,
    pub attempts: u32,
    pub running: bool,
}

/// Everything a renderer may draw, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderView {
    pub splits: Vec<SplitView>,
    pub total: String,
    pub total_best: String,
    pub total_average: String,
}

impl RenderView {
    /// The split being timed, if any splits exist
    pub fn active(&self) -> Option<&SplitView> {
        self.splits.first()
    }

    pub fn running(&self) -> bool {
        self.splits.iter().any(|s| s.running)
    }

    /// Serialize for a front-end that draws from JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Records of one split, enough to write them back out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub id: String,
    pub best: Duration,
    pub average: Duration,
    pub attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_view_json() {
        let view = RenderView {
            splits: vec![SplitView {
                name: "Eastern Palace".into(),
                image: "dungeons.png".into(),
                current: "00:00:12.34".into(),
                best: "00:00:00.00".into(),
                average: "00:00:00.00".into(),
                attempts: 0,
                running: true,
            }],
            total: "00:00:12.34".into(),
            total_best: "00:00:00.00".into(),
            total_average: "00:00:00.00".into(),
        };

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["splits"][0]["name"], "Eastern Palace");
        assert_eq!(json["splits"][0]["running"], true);
        assert_eq!(json["total"], "00:00:12.34");
    }
}
