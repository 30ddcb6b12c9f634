// ============================================================
// Layer 3 - Heart-Rate Trend Rules
// ============================================================
// Rule-based companion to the stress classifier. It needs no
// trained artifacts: it summarises the most recent readings with
// fixed thresholds.
//
//   average of last 5 readings   > 110  -> High Anxiety
//                                 > 90  -> Mild Anxiety
//                                 else  -> Normal
//
//   latest reading               > 120  -> deep-breathing exercise
//                                 > 100  -> slow breathing
//                                 else  -> keep going

use serde::{Deserialize, Serialize};

/// How many trailing readings contribute to the average.
pub const TREND_WINDOW: usize = 5;

const HIGH_ANXIETY_BPM: f32 = 110.0;
const MILD_ANXIETY_BPM: f32 = 90.0;
const ALERT_BPM:        f32 = 120.0;
const ELEVATED_BPM:     f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLevel {
    #[serde(rename = "High Anxiety")]
    High,
    #[serde(rename = "Mild Anxiety")]
    Mild,
    #[serde(rename = "Normal")]
    Normal,
}

impl TrendLevel {
    pub fn from_average(avg_bpm: f32) -> Self {
        if avg_bpm > HIGH_ANXIETY_BPM {
            TrendLevel::High
        } else if avg_bpm > MILD_ANXIETY_BPM {
            TrendLevel::Mild
        } else {
            TrendLevel::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// The readings the average was computed over (oldest first)
    pub window:             Vec<f32>,
    pub average_heart_rate: f32,
    pub anxiety_level:      TrendLevel,
    pub suggestion:         String,
}

impl TrendSummary {
    /// Summarise a reading history. Returns `None` for an empty history.
    pub fn from_readings(readings: &[f32]) -> Option<Self> {
        let start  = readings.len().saturating_sub(TREND_WINDOW);
        let window = &readings[start..];
        let latest = *window.last()?;

        let average = window.iter().sum::<f32>() / window.len() as f32;
        Some(Self {
            window:             window.to_vec(),
            average_heart_rate: average,
            anxiety_level:      TrendLevel::from_average(average),
            suggestion:         calming_suggestion(latest).to_string(),
        })
    }
}

/// Breathing advice for a single reading.
pub fn calming_suggestion(bpm: f32) -> &'static str {
    if bpm > ALERT_BPM {
        "Your heart rate is high! Try deep breathing: inhale for 4 seconds, hold for 4 seconds, exhale slowly."
    } else if bpm > ELEVATED_BPM {
        "You're a little stressed. Try closing your eyes and taking slow deep breaths."
    } else {
        "You're doing well! Stay relaxed and continue at your own pace."
    }
}
