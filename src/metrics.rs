/// Stage timings for a pipeline run
use colored::*;
use instant::Instant;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct StageMetrics {
    pub stage: Stage,
    pub duration_ms: u64,
    pub items_processed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Loading,
    Summarizing,
    Rendering,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Loading => write!(f, "loading"),
            Stage::Summarizing => write!(f, "summarizing"),
            Stage::Rendering => write!(f, "rendering"),
        }
    }
}

#[derive(Default)]
pub struct MetricsCollector {
    stage_timers: HashMap<Stage, Instant>,
    completed: Vec<StageMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing a stage
    pub fn start_stage(&mut self, stage: Stage) {
        self.stage_timers.insert(stage, Instant::now());
    }

    /// End timing a stage and record metrics
    pub fn end_stage(&mut self, stage: Stage, items_processed: Option<u64>) -> &StageMetrics {
        let duration = self
            .stage_timers
            .remove(&stage)
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);

        self.completed.push(StageMetrics {
            stage,
            duration_ms: duration,
            items_processed,
        });
        &self.completed[self.completed.len() - 1]
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.completed.iter().map(|m| m.duration_ms).sum()
    }

    /// Print performance summary
    pub fn print_summary(&self) {
        println!("\n{}", "⏱️  Stage Timings".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_cyan());

        for metric in &self.completed {
            let stage_color = match metric.stage {
                Stage::Loading => "yellow",
                Stage::Summarizing => "green",
                Stage::Rendering => "magenta",
            };

            println!(
                "{}: {} ms{}",
                metric.stage.to_string().color(stage_color),
                metric.duration_ms.to_string().bright_white(),
                if let Some(items) = metric.items_processed {
                    format!(" ({} items)", items.to_string().bright_yellow())
                } else {
                    String::new()
                }
            );
        }

        println!("{}", "-".repeat(50).bright_cyan());
        println!(
            "{}: {} ms",
            "Total Duration".bright_white().bold(),
            self.total_duration_ms().to_string().bright_green().bold()
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_stages_in_completion_order() {
        let mut metrics = MetricsCollector::new();
        metrics.start_stage(Stage::Loading);
        metrics.start_stage(Stage::Summarizing);
        assert_eq!(metrics.end_stage(Stage::Summarizing, Some(12)).items_processed, Some(12));
        metrics.end_stage(Stage::Loading, None);

        let stages: Vec<Stage> = metrics.completed.iter().map(|m| m.stage).collect();
        assert_eq!(stages, vec![Stage::Summarizing, Stage::Loading]);
        assert_eq!(
            metrics.total_duration_ms(),
            metrics.completed.iter().map(|m| m.duration_ms).sum::<u64>()
        );
    }

    #[test]
    fn ending_an_unstarted_stage_records_zero() {
        let mut metrics = MetricsCollector::new();
        assert_eq!(metrics.end_stage(Stage::Rendering, None).duration_ms, 0);
        assert_eq!(Stage::Rendering.to_string(), "rendering");
    }
}
