use super::evolution_engine::ProgressCallback;
use crate::types::GenerationStats;

/// Reports progress through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::info!(
            "Gen {:03} | Max {:.4} | Mean {:.4} | Val {:.4}",
            stats.generation,
            stats.max_fitness,
            stats.mean_fitness,
            stats.validation_return
        );
    }

    fn on_early_stop(&mut self, generation: usize, validation_return: f64) {
        log::info!(
            "Early stop at generation {}: validation cumulative return {:.4}",
            generation,
            validation_return
        );
    }
}

/// Forwards progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationStats),
    EarlyStop { generation: usize, validation_return: f64 },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(stats.clone()));
    }

    fn on_early_stop(&mut self, generation: usize, validation_return: f64) {
        let _ = self.sender.send(ProgressMessage::EarlyStop {
            generation,
            validation_return,
        });
    }
}
