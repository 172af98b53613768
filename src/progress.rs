use std::io::{self, Write};
use std::time::Instant;

/// Tracker de progreso para lotes grandes de planillas.
pub struct ProgressTracker {
    start_time: Instant,
    total_procesadas: u64,
    report_interval: u64,
}

impl ProgressTracker {
    pub fn new(report_interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            total_procesadas: 0,
            report_interval: report_interval.max(1),
        }
    }

    pub fn update(&mut self, procesadas: u64) {
        self.total_procesadas = procesadas;

        if self.total_procesadas % self.report_interval == 0 {
            self.report();
        }
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.total_procesadas as f64 / elapsed
        } else {
            0.0
        };

        print!(
            "\r📊 Filas procesadas: {} | Ritmo: {:.0} filas/s | Tiempo: {:.1}s",
            self.total_procesadas, rate, elapsed
        );
        io::stdout().flush().ok();
    }

    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.total_procesadas as f64 / elapsed
        } else {
            0.0
        };

        println!(
            "\n✅ Completado: {} filas en {:.1}s ({:.0} filas/s)",
            self.total_procesadas, elapsed, rate
        );
    }
}
