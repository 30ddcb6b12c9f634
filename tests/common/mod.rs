#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mindcheck::{PipelineKind, TrainConfig};

pub const EMOTION_ROWS: &[(&str, &str)] = &[
    ("I feel great today", "joy"),
    ("what a wonderful happy morning", "joy"),
    ("I am so happy and grateful", "joy"),
    ("this is amazing news I love it", "joy"),
    ("feeling cheerful and glad", "joy"),
    ("we had a lovely fun day", "joy"),
    ("I feel delighted and excited", "joy"),
    ("such a joyful wonderful evening", "joy"),
    ("this is terrible and unfair", "anger"),
    ("I am furious about this", "anger"),
    ("stop lying to me I hate it", "anger"),
    ("so annoyed and angry right now", "anger"),
    ("this makes me mad", "anger"),
    ("I am irritated by the noise", "anger"),
    ("outraged by how they treated us", "anger"),
    ("they ruined everything I am livid", "anger"),
    ("I'm so scared", "fear"),
    ("I am afraid of the dark", "fear"),
    ("this is frightening and I panic", "fear"),
    ("worried something bad will happen", "fear"),
    ("terrified of the storm tonight", "fear"),
    ("I feel nervous and anxious", "fear"),
    ("the noise at night scares me", "fear"),
    ("I dread the exam tomorrow", "fear"),
];

/// Write the emotion dataset to `dir/emotions.csv`.
pub fn write_emotion_csv(dir: &Path) -> PathBuf {
    let path = dir.join("emotions.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(["message", "emotion"]).unwrap();
    for (message, emotion) in EMOTION_ROWS {
        writer.write_record([*message, *emotion]).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Heart rates 60-80 labelled low and 120-140 labelled high, in 0.5 bpm steps.
pub fn write_stress_csv(dir: &Path) -> PathBuf {
    let path = dir.join("heart_rates.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(["heart_rate", "anxiety_level"]).unwrap();
    for step in 0..=40 {
        let offset = step as f32 * 0.5;
        writer.write_record([format!("{}", 60.0 + offset), "low".to_string()]).unwrap();
        writer.write_record([format!("{}", 120.0 + offset), "high".to_string()]).unwrap();
    }
    writer.flush().unwrap();
    path
}

pub fn emotion_config(dataset: &Path, artifact_dir: &Path) -> TrainConfig {
    let mut cfg = TrainConfig::for_pipeline(PipelineKind::Emotion, dataset.to_string_lossy());
    cfg.artifact_dir = artifact_dir.to_string_lossy().into_owned();
    cfg
}

pub fn stress_config(dataset: &Path, artifact_dir: &Path) -> TrainConfig {
    let mut cfg = TrainConfig::for_pipeline(PipelineKind::Stress, dataset.to_string_lossy());
    cfg.artifact_dir = artifact_dir.to_string_lossy().into_owned();
    cfg
}
